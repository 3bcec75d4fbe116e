use std::sync::Arc;

use tauri::{AppHandle, Manager};

use crate::{append_shutdown_log, backend_supervisor::BackendSupervisor};

/// Marks the shell as quitting and stops the backend exactly once, before
/// the host process is allowed to exit.
pub(crate) fn stop_backend_for_exit(app_handle: &AppHandle, reason: &str) {
    let Some(supervisor) = app_handle.try_state::<Arc<BackendSupervisor>>() else {
        return;
    };
    supervisor.mark_quitting();
    if !supervisor.try_begin_exit_cleanup() {
        return;
    }

    append_shutdown_log(&format!("{reason}; stopping backend"));
    if let Some(path) = supervisor.executable_path() {
        append_shutdown_log(&format!("backend executable: {}", path.display()));
    }
    append_shutdown_log(&format!("backend status before stop: {:?}", supervisor.status()));
    supervisor.stop();
    if let Some(code) = supervisor.last_exit_code() {
        append_shutdown_log(&format!("backend last exit code: {code}"));
    }
}

pub(crate) fn request_quit(app_handle: &AppHandle, reason: &str) {
    stop_backend_for_exit(app_handle, reason);
    app_handle.exit(0);
}

pub(crate) fn handle_exit_requested(app_handle: &AppHandle) {
    stop_backend_for_exit(app_handle, "exit requested");
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    stop_backend_for_exit(app_handle, "desktop process exiting");
    append_shutdown_log("desktop process exited");
}
