use std::sync::Mutex;

use crate::append_desktop_log;

pub(crate) const MIN_ZOOM_LEVEL: i32 = -5;
pub(crate) const MAX_ZOOM_LEVEL: i32 = 5;
const ZOOM_STEP_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomStep {
    Reset,
    In,
    Out,
}

pub(crate) fn next_zoom_level(current: i32, step: ZoomStep) -> i32 {
    match step {
        ZoomStep::Reset => 0,
        ZoomStep::In => current.saturating_add(1).min(MAX_ZOOM_LEVEL),
        ZoomStep::Out => current.saturating_sub(1).max(MIN_ZOOM_LEVEL),
    }
}

/// Scale factor for a zoom level; each level is 20% larger than the one below.
pub(crate) fn zoom_factor(level: i32) -> f64 {
    ZOOM_STEP_FACTOR.powi(level.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL))
}

/// Zoom level of the main window, shared between menu events.
#[derive(Debug, Default)]
pub struct WebviewZoom {
    level: Mutex<i32>,
}

impl WebviewZoom {
    /// Applies `step` and returns the resulting scale factor.
    pub fn apply(&self, step: ZoomStep) -> f64 {
        let mut level = match self.level.lock() {
            Ok(guard) => guard,
            Err(error) => {
                append_desktop_log("zoom level lock poisoned; recovering");
                error.into_inner()
            }
        };
        *level = next_zoom_level(*level, step);
        zoom_factor(*level)
    }

    pub fn level(&self) -> i32 {
        match self.level.lock() {
            Ok(guard) => *guard,
            Err(error) => *error.into_inner(),
        }
    }
}
