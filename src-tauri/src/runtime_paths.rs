use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{APP_DIR_NAME, CONFIG_DIR_ENV, DESKTOP_LOG_FILE, SETTINGS_FILE_NAME};

/// Per-user configuration directory shared with the backend, which loads
/// `config.env` from the same location on startup.
pub(crate) fn default_config_dir() -> Option<PathBuf> {
    if let Ok(raw) = env::var(CONFIG_DIR_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    home::home_dir().map(|home| config_dir_under_home(&home))
}

pub(crate) fn config_dir_under_home(home: &Path) -> PathBuf {
    if cfg!(target_os = "macos") {
        home.join("Library")
            .join("Application Support")
            .join(APP_DIR_NAME)
    } else if cfg!(target_os = "windows") {
        home.join("AppData").join("Local").join(APP_DIR_NAME)
    } else {
        home.join(".config").join(APP_DIR_NAME)
    }
}

pub(crate) fn settings_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SETTINGS_FILE_NAME)
}

pub(crate) fn resolve_desktop_log_path(config_dir: Option<PathBuf>) -> PathBuf {
    match config_dir {
        Some(dir) => dir.join("logs").join(DESKTOP_LOG_FILE),
        None => env::temp_dir().join(APP_DIR_NAME).join(DESKTOP_LOG_FILE),
    }
}
