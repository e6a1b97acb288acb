#![warn(missing_docs)]
//! AR session negotiation and per-frame surface tracking.
//!
//! The host's AR runtime is reached only through the [`ArProvider`] and
//! [`XrFrame`] traits, so the lifecycle and tracking logic here runs the same
//! against a browser runtime binding or the simulated provider in the testkit.
//!
//! - [`SessionController`]: `Idle → Requesting → Active → Ended`, with a side
//!   branch to `AwaitingGesture` when the runtime wants a user activation.
//! - [`HitTestTracker`]: resolves the first hit-test candidate each frame and
//!   keeps the last good pose through transient resolution failures.

pub mod provider;
pub mod session;
pub mod status;
pub mod tracker;

pub use provider::{
    ArProvider, Feature, HitTestResult, HitTestSource, ProviderError, ReferenceSpace,
    ReferenceSpaceKind, SessionInit, SessionMode, XrFrame,
};
pub use session::{
    ActiveSession, Capability, EndReason, SessionController, SessionError, SessionEvent,
    SessionState, StartOutcome,
};
pub use status::StatusLine;
pub use tracker::{HitTestTracker, TrackerUpdate};
