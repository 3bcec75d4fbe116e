use tauri::{AppHandle, Manager, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::{
    append_desktop_log, desktop_bridge, external_url,
    navigation_policy::{self, NavigationDecision},
    webview_zoom::{WebviewZoom, ZoomStep},
    API_KEY_WINDOW_LABEL, API_KEY_WINDOW_TITLE, MAIN_WINDOW_LABEL, MAIN_WINDOW_TITLE,
};

fn handle_navigation(url: &Url) -> bool {
    match navigation_policy::decide_navigation(url) {
        NavigationDecision::Allow => true,
        NavigationDecision::OpenExternally => {
            if let Err(error) = external_url::open_external_url(url.as_str()) {
                append_desktop_log(&format!("failed to open external url {url}: {error}"));
            }
            false
        }
        NavigationDecision::Deny => {
            append_desktop_log(&format!("blocked navigation to {url}"));
            false
        }
    }
}

fn focus_window(window: &WebviewWindow, log_context: &str) {
    if let Err(error) = window.unminimize() {
        append_desktop_log(&format!("failed to unminimize {log_context}: {error}"));
    }
    if let Err(error) = window.show() {
        append_desktop_log(&format!("failed to show {log_context}: {error}"));
    }
    if let Err(error) = window.set_focus() {
        append_desktop_log(&format!("failed to focus {log_context}: {error}"));
    }
}

pub fn create_main_window(app_handle: &AppHandle) -> Result<(), String> {
    if app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_some() {
        return Ok(());
    }

    let bridge_script = desktop_bridge::desktop_bridge_script();
    WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::App("index.html".into()),
    )
    .title(MAIN_WINDOW_TITLE)
    .inner_size(1400.0, 900.0)
    .min_inner_size(1000.0, 600.0)
    .initialization_script(&bridge_script)
    .on_navigation(handle_navigation)
    .build()
    .map(|_| ())
    .map_err(|error| format!("Failed to create main window: {error}"))
}

pub fn show_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("show_main_window skipped: main window not found");
        return;
    };
    focus_window(&window, "main window");
}

pub fn reload_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("reload_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.eval("window.location.reload();") {
        append_desktop_log(&format!("failed to reload main window: {error}"));
    }
}

/// Reloads from the app's entry page, dropping in-page state and any
/// navigation the page made inside the app origin.
pub fn force_reload_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("force_reload_main_window skipped: main window not found");
        return;
    };
    let entry_url = match window.url() {
        Ok(current) => current.join("/index.html"),
        Err(error) => {
            append_desktop_log(&format!("failed to read main window url: {error}"));
            return;
        }
    };
    match entry_url {
        Ok(url) => {
            if let Err(error) = window.navigate(url) {
                append_desktop_log(&format!("failed to force reload main window: {error}"));
            }
        }
        Err(error) => append_desktop_log(&format!("invalid main window entry url: {error}")),
    }
}

pub fn zoom_main_window(app_handle: &AppHandle, step: ZoomStep) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("zoom_main_window skipped: main window not found");
        return;
    };
    let Some(zoom) = app_handle.try_state::<WebviewZoom>() else {
        return;
    };
    let factor = zoom.apply(step);
    if let Err(error) = window.set_zoom(factor) {
        append_desktop_log(&format!("failed to set main window zoom to {factor}: {error}"));
    }
}

/// Opens the credential entry window, or brings the existing one forward.
pub fn open_api_key_window(app_handle: &AppHandle) -> Result<(), String> {
    if let Some(window) = app_handle.get_webview_window(API_KEY_WINDOW_LABEL) {
        focus_window(&window, "api key window");
        return Ok(());
    }

    let bridge_script = desktop_bridge::desktop_bridge_script();
    let builder = WebviewWindowBuilder::new(
        app_handle,
        API_KEY_WINDOW_LABEL,
        WebviewUrl::App("api-key.html".into()),
    )
    .title(API_KEY_WINDOW_TITLE)
    .inner_size(480.0, 280.0)
    .resizable(false)
    .minimizable(false)
    .initialization_script(&bridge_script)
    .on_navigation(handle_navigation);

    let builder = match app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        Some(main_window) => builder
            .parent(&main_window)
            .map_err(|error| format!("Failed to attach api key window: {error}"))?,
        None => builder,
    };

    builder
        .build()
        .map(|_| ())
        .map_err(|error| format!("Failed to create api key window: {error}"))
}
