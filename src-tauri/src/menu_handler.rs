use tauri::AppHandle;

use crate::{append_desktop_log, exit_events, external_url, menu_actions, window_actions};

pub fn handle_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match menu_actions::action_from_menu_id(menu_id) {
        Some(menu_actions::MenuAction::ConfigureApiKey) => {
            if let Err(error) = window_actions::open_api_key_window(app_handle) {
                append_desktop_log(&error);
            }
        }
        Some(menu_actions::MenuAction::ReloadMainWindow) => {
            window_actions::reload_main_window(app_handle)
        }
        Some(menu_actions::MenuAction::ForceReloadMainWindow) => {
            window_actions::force_reload_main_window(app_handle)
        }
        Some(menu_actions::MenuAction::Zoom(step)) => {
            window_actions::zoom_main_window(app_handle, step)
        }
        Some(menu_actions::MenuAction::OpenExternal(url)) => {
            if let Err(error) = external_url::open_external_url(url) {
                append_desktop_log(&format!("failed to open {url}: {error}"));
            }
        }
        Some(menu_actions::MenuAction::Quit) => {
            exit_events::request_quit(app_handle, "menu quit requested");
        }
        None => {}
    }
}
