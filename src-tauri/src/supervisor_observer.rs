use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

use crate::{append_backend_log, backend_supervisor::SupervisorObserver, BACKEND_READY_EVENT};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct BackendReadyPayload {
    pub(crate) url: String,
}

pub(crate) fn emit_backend_ready(app_handle: &AppHandle, backend_url: &str) {
    let payload = BackendReadyPayload {
        url: backend_url.to_string(),
    };
    if let Err(error) = app_handle.emit(BACKEND_READY_EVENT, payload) {
        append_backend_log(&format!("failed to emit {BACKEND_READY_EVENT}: {error}"));
    }
}

/// Routes supervisor notifications to the desktop: blocking error dialogs and
/// webview events. Only ever called from supervisor worker threads, so the
/// blocking dialog never stalls the event loop.
pub(crate) struct DesktopSupervisorObserver {
    app_handle: AppHandle,
}

impl DesktopSupervisorObserver {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl SupervisorObserver for DesktopSupervisorObserver {
    fn report_fatal(&self, title: &str, message: &str) {
        append_backend_log(&format!("{title}: {message}"));
        self.app_handle
            .dialog()
            .message(message)
            .title(title)
            .kind(MessageDialogKind::Error)
            .buttons(MessageDialogButtons::Ok)
            .blocking_show();
    }

    fn backend_ready(&self, backend_url: &str) {
        emit_backend_ready(&self.app_handle, backend_url);
    }
}
