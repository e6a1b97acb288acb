//! AR session lifecycle.
//!
//! ```text
//! Idle ──start()──▶ Requesting ──ok──▶ Active ──end()──▶ Ended ──▶ AwaitingGesture
//!  ▲                   │  │                                              │
//!  └──── other error ──┘  └── gesture required ──▶ AwaitingGesture ◀─────┘
//!                                                    │
//!                                  pointer-down ─────┘ (one retry of start())
//! ```

use crate::provider::{
    ArProvider, HitTestSource, ProviderError, ReferenceSpace, ReferenceSpaceKind, SessionInit,
};
use crate::status::{self, StatusLine};
use holoanchor_core::SessionHandle;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No session, nothing pending.
    Idle,
    /// A session request is awaiting the runtime.
    Requesting,
    /// The runtime asked for a user activation; the next pointer-down retries.
    AwaitingGesture,
    /// Session live, frame loop may run.
    Active,
    /// Session torn down; transient before re-arming the gesture wait.
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::AwaitingGesture => "awaiting-gesture",
            Self::Active => "active",
            Self::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// Result of a capability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
    /// Immersive AR sessions can be requested.
    Supported,
    /// A runtime exists but cannot run immersive AR.
    Unsupported,
    /// No AR runtime is exposed by the host.
    ProviderAbsent,
}

/// Who ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndReason {
    /// Ended by this application.
    Local,
    /// Ended by the runtime or the OS (e.g. the user left AR through system UI).
    Provider,
}

/// Errors from [`SessionController::start`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No AR runtime is exposed by the host.
    #[error("no AR runtime available")]
    ProviderAbsent,
    /// The runtime wants a user activation; a retry is armed for the next pointer-down.
    #[error("user gesture required: {0}")]
    GestureRequired(#[source] ProviderError),
    /// Any other runtime failure; requires a fresh user-triggered attempt.
    #[error("session request failed: {0}")]
    Request(#[from] ProviderError),
    /// `start()` called from a state that does not allow it.
    #[error("cannot start a session while {0}")]
    InvalidState(SessionState),
}

/// Resources owned by a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSession {
    /// Session handle.
    pub handle: SessionHandle,
    /// Stable world frame used for pose resolution.
    pub reference_space: ReferenceSpace,
    /// Viewer frame that seeded the hit-test source.
    pub viewer_space: ReferenceSpace,
    /// Hit-test subscription along the viewer ray.
    pub hit_test_source: HitTestSource,
}

/// Lifecycle notifications, drained by the owner after each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session became active.
    Started(ActiveSession),
    /// A session ended and its resources were released.
    Ended {
        /// The session that ended.
        handle: SessionHandle,
        /// Who ended it.
        reason: EndReason,
    },
}

/// Successful outcomes of [`SessionController::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session is live.
    Started(ActiveSession),
    /// A session was already live; nothing was requested.
    AlreadyActive,
}

/// Owns the single live session and its spaces.
#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    active: Option<ActiveSession>,
    /// One-shot: consumed by the first pointer-down after arming.
    gesture_armed: bool,
    events: Vec<SessionEvent>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    /// A controller in `Idle`.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            active: None,
            gesture_armed: false,
            events: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The live session, if any.
    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Whether a session is live.
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active && self.active.is_some()
    }

    /// Whether a pointer-down would currently trigger a retry.
    pub fn gesture_armed(&self) -> bool {
        self.gesture_armed
    }

    /// Drain lifecycle events raised since the last call.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Query the runtime for immersive AR support. Never starts a session.
    pub async fn check_capability<P, S>(&mut self, provider: &P, status: &mut S) -> Capability
    where
        P: ArProvider + ?Sized,
        S: StatusLine + ?Sized,
    {
        if !provider.is_available() {
            info!("AR runtime absent");
            status.show(status::MSG_PROVIDER_ABSENT);
            return Capability::ProviderAbsent;
        }

        status.show(status::MSG_CHECKING);
        match provider
            .is_session_supported(crate::SessionMode::ImmersiveAr)
            .await
        {
            Ok(true) => {
                info!("immersive AR supported");
                Capability::Supported
            }
            Ok(false) => {
                info!("immersive AR not supported");
                status.show(status::MSG_UNSUPPORTED);
                Capability::Unsupported
            }
            Err(err) => {
                warn!(%err, "capability query failed");
                status.show(status::MSG_UNSUPPORTED);
                Capability::Unsupported
            }
        }
    }

    /// Negotiate a session and acquire its spaces and hit-test source.
    ///
    /// Only one session is ever live: calling this while `Active` returns
    /// [`StartOutcome::AlreadyActive`] without touching the runtime.
    pub async fn start<P, S>(
        &mut self,
        provider: &mut P,
        status: &mut S,
    ) -> Result<StartOutcome, SessionError>
    where
        P: ArProvider + ?Sized,
        S: StatusLine + ?Sized,
    {
        match self.state {
            SessionState::Active => return Ok(StartOutcome::AlreadyActive),
            SessionState::Idle | SessionState::AwaitingGesture => {}
            other => return Err(SessionError::InvalidState(other)),
        }

        if !provider.is_available() {
            status.show(status::MSG_PROVIDER_ABSENT);
            self.gesture_armed = false;
            self.state = SessionState::Idle;
            return Err(SessionError::ProviderAbsent);
        }

        self.gesture_armed = false;
        self.state = SessionState::Requesting;
        status.show(status::MSG_STARTING);
        debug!("requesting immersive-ar session");

        let handle = match provider.request_session(&SessionInit::immersive_ar()).await {
            Ok(handle) => handle,
            Err(err) => return Err(self.fail(err, status)),
        };

        let active = match Self::acquire(provider, handle).await {
            Ok(active) => active,
            Err(err) => {
                // The runtime granted a session we can't use; don't leak it.
                provider.end_session(handle);
                return Err(self.fail(err, status));
            }
        };

        info!(session = %handle, "AR session active");
        self.active = Some(active);
        self.state = SessionState::Active;
        self.events.push(SessionEvent::Started(active));
        status.hide();
        Ok(StartOutcome::Started(active))
    }

    async fn acquire<P>(provider: &mut P, handle: SessionHandle) -> Result<ActiveSession, ProviderError>
    where
        P: ArProvider + ?Sized,
    {
        let viewer_space = provider
            .request_reference_space(handle, ReferenceSpaceKind::Viewer)
            .await?;
        let reference_space = provider
            .request_reference_space(handle, ReferenceSpaceKind::Local)
            .await?;
        let hit_test_source = provider
            .request_hit_test_source(handle, &viewer_space)
            .await?;
        Ok(ActiveSession {
            handle,
            reference_space,
            viewer_space,
            hit_test_source,
        })
    }

    fn fail<S>(&mut self, err: ProviderError, status: &mut S) -> SessionError
    where
        S: StatusLine + ?Sized,
    {
        if err.requires_user_gesture() {
            info!(%err, "session request needs a user gesture");
            self.arm_gesture_wait(status);
            SessionError::GestureRequired(err)
        } else {
            warn!(%err, "session request failed");
            self.state = SessionState::Idle;
            status.show(&status::start_failed(err.reason()));
            SessionError::Request(err)
        }
    }

    fn arm_gesture_wait<S>(&mut self, status: &mut S)
    where
        S: StatusLine + ?Sized,
    {
        self.gesture_armed = true;
        self.state = SessionState::AwaitingGesture;
        status.show(status::MSG_TAP_TO_START);
    }

    /// Consume the armed gesture retry.
    ///
    /// Returns `true` exactly once per arming; the caller then runs
    /// [`start`](Self::start).
    pub fn take_gesture_retry(&mut self) -> bool {
        std::mem::replace(&mut self.gesture_armed, false)
    }

    /// Tear the live session down and re-arm the gesture wait.
    ///
    /// The caller must have stopped its frame loop before calling this: the
    /// spaces and hit-test source are released here. Returns `None` when no
    /// session was live.
    pub fn end<P, S>(
        &mut self,
        provider: &mut P,
        status: &mut S,
        reason: EndReason,
    ) -> Option<SessionEvent>
    where
        P: ArProvider + ?Sized,
        S: StatusLine + ?Sized,
    {
        let active = self.active.take()?;
        if reason == EndReason::Local {
            provider.end_session(active.handle);
        }
        self.state = SessionState::Ended;
        info!(session = %active.handle, ?reason, "AR session ended");

        let event = SessionEvent::Ended {
            handle: active.handle,
            reason,
        };
        self.events.push(event);

        self.arm_gesture_wait(status);
        status.show(status::MSG_SESSION_ENDED);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_controller_is_idle() {
        let controller = SessionController::new();
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(!controller.is_active());
        assert!(!controller.gesture_armed());
    }

    #[test]
    fn gesture_retry_is_one_shot() {
        let mut controller = SessionController::new();
        controller.gesture_armed = true;
        assert!(controller.take_gesture_retry());
        assert!(!controller.take_gesture_retry());
    }

    #[test]
    fn state_display_names() {
        assert_eq!(SessionState::AwaitingGesture.to_string(), "awaiting-gesture");
        let err = SessionError::InvalidState(SessionState::Requesting);
        assert_eq!(err.to_string(), "cannot start a session while requesting");
    }
}
