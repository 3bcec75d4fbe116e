use tauri::State;

use crate::settings_store::SettingsStore;

// These two commands are the whole bridge surface. No fs, shell or process
// plugin is installed, so the webview cannot reach anything else.

#[tauri::command]
pub(crate) fn desktop_bridge_get_api_key(settings: State<'_, SettingsStore>) -> String {
    settings.read()
}

#[tauri::command]
pub(crate) fn desktop_bridge_save_api_key(
    settings: State<'_, SettingsStore>,
    api_key: String,
) -> bool {
    settings.save(&api_key)
}
