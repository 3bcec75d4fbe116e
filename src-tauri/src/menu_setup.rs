use tauri::{
    menu::{AboutMetadata, Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle,
};

use crate::{menu_actions, MAIN_WINDOW_TITLE};

fn menu_item(
    app_handle: &AppHandle,
    id: &str,
    text: &str,
    accelerator: Option<&str>,
) -> Result<MenuItem<tauri::Wry>, String> {
    MenuItem::with_id(app_handle, id, text, true, accelerator)
        .map_err(|error| format!("Failed to create menu item {id}: {error}"))
}

fn separator(app_handle: &AppHandle) -> Result<PredefinedMenuItem<tauri::Wry>, String> {
    PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create menu separator: {error}"))
}

fn predefined<F>(what: &str, build: F) -> Result<PredefinedMenuItem<tauri::Wry>, String>
where
    F: FnOnce() -> tauri::Result<PredefinedMenuItem<tauri::Wry>>,
{
    build().map_err(|error| format!("Failed to create {what} menu item: {error}"))
}

pub fn setup_app_menu(app_handle: &AppHandle) -> Result<(), String> {
    let version = app_handle.package_info().version.to_string();
    let about = predefined("about", || {
        PredefinedMenuItem::about(
            app_handle,
            Some("About Resume Optimizer"),
            Some(AboutMetadata {
                name: Some(MAIN_WINDOW_TITLE.to_string()),
                version: Some(version),
                comments: Some(
                    "AI-powered resume optimization tool\nPowered by Google Gemini AI".to_string(),
                ),
                ..Default::default()
            }),
        )
    })?;
    let configure_api_key = menu_item(
        app_handle,
        menu_actions::MENU_CONFIGURE_API_KEY,
        "Configure API Key...",
        Some("CmdOrCtrl+K"),
    )?;
    let quit = menu_item(
        app_handle,
        menu_actions::MENU_QUIT,
        "Quit Resume Optimizer",
        Some("CmdOrCtrl+Q"),
    )?;
    let app_menu = Submenu::with_items(
        app_handle,
        MAIN_WINDOW_TITLE,
        true,
        &[
            &about,
            &separator(app_handle)?,
            &configure_api_key,
            &separator(app_handle)?,
            &quit,
        ],
    )
    .map_err(|error| format!("Failed to build application menu: {error}"))?;

    let new_analysis = menu_item(
        app_handle,
        menu_actions::MENU_NEW_ANALYSIS,
        "New Analysis",
        Some("CmdOrCtrl+N"),
    )?;
    let open_repository = menu_item(
        app_handle,
        menu_actions::MENU_OPEN_REPOSITORY,
        "Open GitHub Repository",
        None,
    )?;
    let file_menu = Submenu::with_items(
        app_handle,
        "File",
        true,
        &[&new_analysis, &separator(app_handle)?, &open_repository],
    )
    .map_err(|error| format!("Failed to build File menu: {error}"))?;

    let edit_menu = Submenu::with_items(
        app_handle,
        "Edit",
        true,
        &[
            &predefined("undo", || PredefinedMenuItem::undo(app_handle, None))?,
            &predefined("redo", || PredefinedMenuItem::redo(app_handle, None))?,
            &separator(app_handle)?,
            &predefined("cut", || PredefinedMenuItem::cut(app_handle, None))?,
            &predefined("copy", || PredefinedMenuItem::copy(app_handle, None))?,
            &predefined("paste", || PredefinedMenuItem::paste(app_handle, None))?,
            &predefined("select all", || {
                PredefinedMenuItem::select_all(app_handle, None)
            })?,
        ],
    )
    .map_err(|error| format!("Failed to build Edit menu: {error}"))?;

    let view_menu = Submenu::with_items(
        app_handle,
        "View",
        true,
        &[
            &menu_item(app_handle, menu_actions::MENU_RELOAD, "Reload", Some("CmdOrCtrl+R"))?,
            &menu_item(
                app_handle,
                menu_actions::MENU_FORCE_RELOAD,
                "Force Reload",
                Some("CmdOrCtrl+Shift+R"),
            )?,
            &separator(app_handle)?,
            &menu_item(
                app_handle,
                menu_actions::MENU_RESET_ZOOM,
                "Actual Size",
                Some("CmdOrCtrl+0"),
            )?,
            &menu_item(app_handle, menu_actions::MENU_ZOOM_IN, "Zoom In", Some("CmdOrCtrl+="))?,
            &menu_item(app_handle, menu_actions::MENU_ZOOM_OUT, "Zoom Out", Some("CmdOrCtrl+-"))?,
            &separator(app_handle)?,
            &predefined("fullscreen", || {
                PredefinedMenuItem::fullscreen(app_handle, None)
            })?,
        ],
    )
    .map_err(|error| format!("Failed to build View menu: {error}"))?;

    let window_menu = Submenu::with_items(
        app_handle,
        "Window",
        true,
        &[
            &predefined("minimize", || PredefinedMenuItem::minimize(app_handle, None))?,
            &predefined("close", || PredefinedMenuItem::close_window(app_handle, None))?,
        ],
    )
    .map_err(|error| format!("Failed to build Window menu: {error}"))?;

    let help_menu = Submenu::with_items(
        app_handle,
        "Help",
        true,
        &[
            &menu_item(
                app_handle,
                menu_actions::MENU_GET_API_KEY,
                "Get Google Gemini API Key",
                None,
            )?,
            &menu_item(
                app_handle,
                menu_actions::MENU_DOCUMENTATION,
                "Documentation",
                None,
            )?,
            &separator(app_handle)?,
            &menu_item(
                app_handle,
                menu_actions::MENU_REPORT_ISSUE,
                "Report Issue",
                None,
            )?,
        ],
    )
    .map_err(|error| format!("Failed to build Help menu: {error}"))?;

    let menu = Menu::with_items(
        app_handle,
        &[
            &app_menu,
            &file_menu,
            &edit_menu,
            &view_menu,
            &window_menu,
            &help_menu,
        ],
    )
    .map_err(|error| format!("Failed to build application menu bar: {error}"))?;

    app_handle
        .set_menu(menu)
        .map_err(|error| format!("Failed to install application menu: {error}"))?;
    Ok(())
}
