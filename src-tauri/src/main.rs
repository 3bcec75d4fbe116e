#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod backend_path;
mod backend_readiness;
mod backend_supervisor;
mod desktop_bridge;
mod desktop_bridge_commands;
mod exit_events;
mod exit_state;
mod external_url;
mod logging;
mod menu_actions;
mod menu_handler;
mod menu_setup;
mod navigation_policy;
mod process_control;
mod runtime_paths;
mod settings_store;
mod supervisor_observer;
mod webview_zoom;
mod window_actions;

use std::sync::{Mutex, OnceLock};

pub(crate) use app_constants::*;

static DESKTOP_LOG_WRITE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn main() {
    app_runtime::run();
}

pub(crate) fn append_desktop_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Runtime, message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Startup, message);
}

pub(crate) fn append_backend_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Backend, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Shutdown, message);
}

fn append_desktop_log_with_category(category: logging::DesktopLogCategory, message: &str) {
    logging::append_desktop_log(
        category,
        message,
        runtime_paths::default_config_dir(),
        DESKTOP_LOG_MAX_BYTES,
        LOG_BACKUP_COUNT,
        &DESKTOP_LOG_WRITE_LOCK,
    )
}
