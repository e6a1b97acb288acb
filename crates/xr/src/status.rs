//! User-visible status text.

/// Plain text surface updated on lifecycle transitions.
pub trait StatusLine {
    /// Show `text`, replacing whatever was there.
    fn show(&mut self, text: &str);
    /// Hide the status line.
    fn hide(&mut self);
}

/// No AR runtime exposed by the host.
pub const MSG_PROVIDER_ABSENT: &str = "This device does not support WebXR AR.";
/// Runtime present but immersive AR is unavailable.
pub const MSG_UNSUPPORTED: &str =
    "AR is not supported on this device. Open this page in iOS Safari 17+ or Android Chrome.";
/// Capability query in flight.
pub const MSG_CHECKING: &str = "Checking AR support...";
/// Session request in flight.
pub const MSG_STARTING: &str = "Starting AR...";
/// Waiting for a user activation before retrying.
pub const MSG_TAP_TO_START: &str = "Tap the screen once to start AR.";
/// Shown after any session end.
pub const MSG_SESSION_ENDED: &str = "The AR session has ended. Tap the screen to start again.";

/// Message for a session-request failure that needs a manual retry.
pub fn start_failed(reason: &str) -> String {
    format!("Could not start AR: {reason}")
}
