use std::sync::Arc;

use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, backend_readiness,
    backend_supervisor::BackendSupervisor, exit_events, menu_handler, menu_setup,
    runtime_paths, settings_store::SettingsStore, supervisor_observer, webview_zoom::WebviewZoom,
    window_actions, MAIN_WINDOW_LABEL,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        runtime_paths::resolve_desktop_log_path(runtime_paths::default_config_dir()).display()
    ));

    let settings_store = SettingsStore::from_env();
    if let Some(path) = settings_store.settings_path() {
        append_startup_log(&format!("settings file: {}", path.display()));
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _args, _cwd| {
            append_desktop_log("second instance launched, focusing main window");
            window_actions::show_main_window(app_handle);
        }))
        .plugin(tauri_plugin_dialog::init())
        .manage(settings_store)
        .manage(WebviewZoom::default())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_get_api_key,
            crate::desktop_bridge_commands::desktop_bridge_save_api_key,
        ])
        .on_menu_event(|app_handle, event| {
            menu_handler::handle_menu_event(app_handle, event.id().as_ref())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            if let WindowEvent::Destroyed = event {
                exit_events::request_quit(window.app_handle(), "main window closed");
            }
        })
        .on_page_load(|webview, payload| {
            if webview.label() != MAIN_WINDOW_LABEL {
                return;
            }
            match payload.event() {
                PageLoadEvent::Started => {
                    append_desktop_log(&format!("page-load started: {}", payload.url()));
                }
                PageLoadEvent::Finished => {
                    append_desktop_log(&format!("page-load finished: {}", payload.url()));
                    let app_handle = webview.app_handle();
                    let supervisor = app_handle.state::<Arc<BackendSupervisor>>();
                    if supervisor.request_start_once() {
                        append_startup_log("first page load finished, starting backend");
                    } else if supervisor.is_backend_ready() {
                        supervisor_observer::emit_backend_ready(
                            app_handle,
                            supervisor.backend_url(),
                        );
                    }
                }
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            let resource_dir = match app_handle.path().resource_dir() {
                Ok(dir) => Some(dir),
                Err(error) => {
                    append_startup_log(&format!("failed to resolve resource dir: {error}"));
                    None
                }
            };
            let supervisor = Arc::new(BackendSupervisor::new(
                resource_dir,
                backend_readiness::backend_url_from_env(),
                backend_readiness::ready_timeout_from_env(),
                Arc::new(supervisor_observer::DesktopSupervisorObserver::new(
                    app_handle.clone(),
                )),
            ));
            app_handle.manage(supervisor);

            if let Err(error) = menu_setup::setup_app_menu(&app_handle) {
                append_startup_log(&format!("failed to initialize menu: {error}"));
            }
            window_actions::create_main_window(&app_handle)?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { .. } => {
                exit_events::handle_exit_requested(app_handle);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            _ => {}
        });
}
