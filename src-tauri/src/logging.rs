use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DesktopLogCategory {
    Startup,
    Runtime,
    Backend,
    Shutdown,
}

impl DesktopLogCategory {
    fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Runtime => "runtime",
            Self::Backend => "backend",
            Self::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn format_log_line(category: DesktopLogCategory, message: &str) -> String {
    format!(
        "[{}] [{}] {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        category.as_str(),
        message
    )
}

fn backup_path(log_path: &Path, index: usize) -> PathBuf {
    let mut name = log_path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Shifts `desktop.log` -> `desktop.log.1` -> ... once the live file reaches
/// `max_bytes`. The oldest backup beyond `backup_count` is dropped.
pub(crate) fn rotate_log_if_needed(log_path: &Path, max_bytes: u64, backup_count: usize) {
    let Ok(metadata) = fs::metadata(log_path) else {
        return;
    };
    if metadata.len() < max_bytes {
        return;
    }

    if backup_count == 0 {
        let _ = fs::remove_file(log_path);
        return;
    }

    let _ = fs::remove_file(backup_path(log_path, backup_count));
    for index in (1..backup_count).rev() {
        let from = backup_path(log_path, index);
        if from.exists() {
            let _ = fs::rename(&from, backup_path(log_path, index + 1));
        }
    }
    let _ = fs::rename(log_path, backup_path(log_path, 1));
}

pub(crate) fn append_log_line(
    log_path: &Path,
    line: &str,
    max_bytes: u64,
    backup_count: usize,
) -> std::io::Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    rotate_log_if_needed(log_path, max_bytes, backup_count);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    file.write_all(line.as_bytes())
}

pub(crate) fn append_desktop_log(
    category: DesktopLogCategory,
    message: &str,
    config_dir: Option<PathBuf>,
    max_bytes: u64,
    backup_count: usize,
    write_lock: &OnceLock<Mutex<()>>,
) {
    let line = format_log_line(category, message);
    if cfg!(debug_assertions) {
        eprint!("{line}");
    }

    let log_path = crate::runtime_paths::resolve_desktop_log_path(config_dir);
    let lock = write_lock.get_or_init(|| Mutex::new(()));
    let _guard = match lock.lock() {
        Ok(guard) => guard,
        Err(error) => error.into_inner(),
    };
    if let Err(error) = append_log_line(&log_path, &line, max_bytes, backup_count) {
        eprintln!(
            "failed to write desktop log {}: {}",
            log_path.display(),
            error
        );
    }
}
