//! Simulated AR runtime.

use async_trait::async_trait;
use holoanchor_core::SessionHandle;
use holoanchor_xr::{
    ArProvider, HitTestSource, ProviderError, ReferenceSpace, ReferenceSpaceKind, SessionInit,
    SessionMode,
};
use std::collections::VecDeque;
use tracing::debug;

/// Which setup step of a granted session should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupFailure {
    /// Reference-space request for this kind.
    ReferenceSpace(ReferenceSpaceKind, ProviderError),
    /// Hit-test source request.
    HitTestSource(ProviderError),
}

/// AR runtime driven by a queue of scripted outcomes.
///
/// Each `request_session` call pops one outcome; an empty queue grants the
/// session.
#[derive(Debug, Clone)]
pub struct SimProvider {
    /// Whether a runtime is exposed.
    pub available: bool,
    /// Answer to capability queries.
    pub supported: Result<bool, ProviderError>,
    /// Outcomes for successive session requests.
    pub session_outcomes: VecDeque<Result<(), ProviderError>>,
    /// One-shot failure injected into the next granted session's setup.
    pub setup_failure: Option<SetupFailure>,

    /// Every session request received, in order.
    pub session_requests: Vec<SessionInit>,
    /// Sessions granted.
    pub granted: Vec<SessionHandle>,
    /// Sessions ended through `end_session`.
    pub ended: Vec<SessionHandle>,
    /// Reference-space kinds requested, in order.
    pub space_requests: Vec<ReferenceSpaceKind>,
    /// Hit-test sources issued.
    pub hit_test_sources: Vec<HitTestSource>,

    next_id: u64,
    live: Option<SessionHandle>,
}

impl Default for SimProvider {
    fn default() -> Self {
        Self::supported()
    }
}

impl SimProvider {
    /// A runtime that supports immersive AR and grants every request.
    pub fn supported() -> Self {
        Self {
            available: true,
            supported: Ok(true),
            session_outcomes: VecDeque::new(),
            setup_failure: None,
            session_requests: Vec::new(),
            granted: Vec::new(),
            ended: Vec::new(),
            space_requests: Vec::new(),
            hit_test_sources: Vec::new(),
            next_id: 1,
            live: None,
        }
    }

    /// A runtime that reports immersive AR as unsupported.
    pub fn unsupported() -> Self {
        Self {
            supported: Ok(false),
            ..Self::supported()
        }
    }

    /// No runtime at all.
    pub fn absent() -> Self {
        Self {
            available: false,
            ..Self::supported()
        }
    }

    /// Queue an outcome for the next session request.
    pub fn push_outcome(&mut self, outcome: Result<(), ProviderError>) -> &mut Self {
        self.session_outcomes.push_back(outcome);
        self
    }

    /// Queue a rejection that asks for a user gesture.
    pub fn reject_with_gesture(&mut self) -> &mut Self {
        self.push_outcome(Err(ProviderError::Rejected(
            "The requested session requires a user gesture.".into(),
        )))
    }

    /// The session the runtime considers live.
    pub fn live_session(&self) -> Option<SessionHandle> {
        self.live
    }

    /// Simulate the runtime ending its session on its own (e.g. OS back gesture).
    pub fn drop_session(&mut self) -> Option<SessionHandle> {
        self.live.take()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check_live(&self, session: SessionHandle) -> Result<(), ProviderError> {
        if self.live == Some(session) {
            Ok(())
        } else {
            Err(ProviderError::InvalidState(format!("{session} is not live")))
        }
    }
}

#[async_trait(?Send)]
impl ArProvider for SimProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn is_session_supported(&self, _mode: SessionMode) -> Result<bool, ProviderError> {
        self.supported.clone()
    }

    async fn request_session(
        &mut self,
        init: &SessionInit,
    ) -> Result<SessionHandle, ProviderError> {
        self.session_requests.push(init.clone());
        if let Some(Err(err)) = self.session_outcomes.pop_front() {
            debug!(%err, "sim: session request rejected");
            return Err(err);
        }
        if self.live.is_some() {
            return Err(ProviderError::InvalidState(
                "an immersive session is already running".into(),
            ));
        }
        let handle = SessionHandle(self.next_id());
        self.live = Some(handle);
        self.granted.push(handle);
        debug!(%handle, "sim: session granted");
        Ok(handle)
    }

    async fn request_reference_space(
        &mut self,
        session: SessionHandle,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, ProviderError> {
        self.check_live(session)?;
        self.space_requests.push(kind);
        let fails = matches!(
            &self.setup_failure,
            Some(SetupFailure::ReferenceSpace(failing, _)) if *failing == kind
        );
        if fails {
            if let Some(SetupFailure::ReferenceSpace(_, err)) = self.setup_failure.take() {
                return Err(err);
            }
        }
        Ok(ReferenceSpace {
            id: self.next_id(),
            session,
            kind,
        })
    }

    async fn request_hit_test_source(
        &mut self,
        session: SessionHandle,
        space: &ReferenceSpace,
    ) -> Result<HitTestSource, ProviderError> {
        self.check_live(session)?;
        if matches!(self.setup_failure, Some(SetupFailure::HitTestSource(_))) {
            if let Some(SetupFailure::HitTestSource(err)) = self.setup_failure.take() {
                return Err(err);
            }
        }
        let source = HitTestSource {
            id: self.next_id(),
            session,
            space: *space,
        };
        self.hit_test_sources.push(source);
        Ok(source)
    }

    fn end_session(&mut self, session: SessionHandle) {
        if self.live == Some(session) {
            self.live = None;
            self.ended.push(session);
            debug!(%session, "sim: session ended");
        } else {
            debug!(%session, "sim: end for a session that is not live");
        }
    }
}
