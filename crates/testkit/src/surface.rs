//! Overlay and status surfaces that remember what they were told.

use holoanchor_overlay::OverlaySurface;
use holoanchor_xr::StatusLine;

/// Overlay element stand-in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingOverlay {
    /// Currently shown.
    pub visible: bool,
    /// Embedded document URL.
    pub source: Option<String>,
    /// Every CSS transform applied, in order.
    pub transforms: Vec<String>,
    /// Number of show calls.
    pub shows: u32,
    /// Number of hide calls.
    pub hides: u32,
}

impl RecordingOverlay {
    /// Latest transform applied.
    pub fn last_transform(&self) -> Option<&str> {
        self.transforms.last().map(String::as_str)
    }
}

impl OverlaySurface for RecordingOverlay {
    fn show(&mut self) {
        self.visible = true;
        self.shows += 1;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hides += 1;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_transform(&mut self, css: &str) {
        self.transforms.push(css.to_string());
    }

    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
    }
}

/// Status line stand-in keeping its full history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingStatus {
    /// Text currently shown; `None` while hidden.
    pub current: Option<String>,
    /// Every message shown, in order.
    pub history: Vec<String>,
}

impl RecordingStatus {
    /// Whether any message so far contained `needle`.
    pub fn ever_showed(&self, needle: &str) -> bool {
        self.history.iter().any(|line| line.contains(needle))
    }
}

impl StatusLine for RecordingStatus {
    fn show(&mut self, text: &str) {
        self.current = Some(text.to_string());
        self.history.push(text.to_string());
    }

    fn hide(&mut self) {
        self.current = None;
    }
}
