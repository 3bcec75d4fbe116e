use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{append_desktop_log, runtime_paths, API_KEY_SETTING};

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("settings directory is unavailable (no home directory found)")]
    ConfigDirUnavailable,
    #[error("settings value must be a single line")]
    InvalidValue,
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> SettingsError {
    let path = path.to_path_buf();
    move |source| SettingsError::Io {
        action,
        path,
        source,
    }
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Returns the value of the first `KEY=<rest of line>` occurrence whose rest
/// is non-empty, trimmed. Anything else reads as an empty value.
pub(crate) fn parse_setting_value(contents: &str, key: &str) -> String {
    let marker = format!("{key}=");
    for (index, _) in contents.match_indices(&marker) {
        let rest = &contents[index + marker.len()..];
        let line_end = rest
            .find(is_line_terminator)
            .unwrap_or(rest.len());
        let raw_value = &rest[..line_end];
        if !raw_value.is_empty() {
            return raw_value.trim().to_string();
        }
    }
    String::new()
}

pub(crate) fn render_setting_line(key: &str, value: &str) -> String {
    format!("{key}={value}\n")
}

/// Owns the single persisted API credential. The file is the only source of
/// truth; a missing file reads as an empty value.
#[derive(Debug)]
pub(crate) struct SettingsStore {
    config_dir: Option<PathBuf>,
}

impl SettingsStore {
    pub(crate) fn new(config_dir: Option<PathBuf>) -> Self {
        Self { config_dir }
    }

    pub(crate) fn from_env() -> Self {
        Self::new(runtime_paths::default_config_dir())
    }

    pub(crate) fn settings_path(&self) -> Option<PathBuf> {
        self.config_dir
            .as_deref()
            .map(runtime_paths::settings_file_path)
    }

    pub(crate) fn try_read(&self) -> Result<String, SettingsError> {
        let path = self
            .settings_path()
            .ok_or(SettingsError::ConfigDirUnavailable)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(parse_setting_value(&contents, API_KEY_SETTING)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(error) => Err(io_error("read settings file", &path)(error)),
        }
    }

    pub(crate) fn try_save(&self, value: &str) -> Result<(), SettingsError> {
        let value = value.trim();
        if value.contains(is_line_terminator) {
            return Err(SettingsError::InvalidValue);
        }

        let config_dir = self
            .config_dir
            .as_deref()
            .ok_or(SettingsError::ConfigDirUnavailable)?;
        fs::create_dir_all(config_dir).map_err(io_error("create settings directory", config_dir))?;

        let path = runtime_paths::settings_file_path(config_dir);
        let mut staging_name = path.as_os_str().to_os_string();
        staging_name.push(".tmp");
        let staging_path = PathBuf::from(staging_name);

        fs::write(&staging_path, render_setting_line(API_KEY_SETTING, value))
            .map_err(io_error("write settings file", &staging_path))?;
        if let Err(error) = fs::rename(&staging_path, &path) {
            let _ = fs::remove_file(&staging_path);
            return Err(io_error("replace settings file", &path)(error));
        }
        Ok(())
    }

    pub(crate) fn read(&self) -> String {
        match self.try_read() {
            Ok(value) => value,
            Err(error) => {
                append_desktop_log(&format!("error reading settings: {error}"));
                String::new()
            }
        }
    }

    pub(crate) fn save(&self, value: &str) -> bool {
        match self.try_save(value) {
            Ok(()) => true,
            Err(error) => {
                append_desktop_log(&format!("error saving settings: {error}"));
                false
            }
        }
    }
}
