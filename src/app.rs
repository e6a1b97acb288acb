//! The owned AR state and the handlers that mutate it.
//!
//! Everything runs on one thread: the frame callback and the event handlers
//! take `&mut self` in turn, so no handler can observe another mid-update.

use crate::config::HoloConfig;
use crate::dispatch::AppEvent;
use anyhow::Result;
use glam::Vec3;
use holoanchor_core::{FrameTime, SessionHandle, Viewport};
use holoanchor_hologram::{PlacementController, PlacementTrigger, Reticle, SceneRenderer};
use holoanchor_overlay::{OverlayProjector, OverlaySurface};
use holoanchor_xr::{
    ArProvider, Capability, EndReason, HitTestTracker, SessionController, SessionError,
    SessionEvent, SessionState, StartOutcome, StatusLine, XrFrame,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Something observable the app did, drained by the caller for logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppNotice {
    CapabilityChecked { capability: Capability },
    SessionStarted { session: SessionHandle },
    StartFailed { error: String, awaiting_gesture: bool },
    GestureRetry,
    SessionEnded { session: SessionHandle, reason: EndReason },
    Placed { trigger: PlacementTrigger, position: [f32; 3] },
    SelectIgnored,
    OverlayShown,
    OverlayHidden,
    OverlayMoved { x: f32, y: f32, scale: f32 },
    Resized { width: u32, height: u32 },
    FrameDropped,
}

impl AppNotice {
    /// Short label used as the event-log `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CapabilityChecked { .. } => "capability",
            Self::SessionStarted { .. } => "session_started",
            Self::StartFailed { .. } => "start_failed",
            Self::GestureRetry => "gesture_retry",
            Self::SessionEnded { .. } => "session_ended",
            Self::Placed { .. } => "placed",
            Self::SelectIgnored => "select_ignored",
            Self::OverlayShown => "overlay_shown",
            Self::OverlayHidden => "overlay_hidden",
            Self::OverlayMoved { .. } => "overlay_moved",
            Self::Resized { .. } => "resized",
            Self::FrameDropped => "frame_dropped",
        }
    }
}

/// All mutable AR/placement state, owned in one place.
#[derive(Debug)]
pub struct ArSessionState {
    pub session: SessionController,
    pub tracker: HitTestTracker,
    pub placement: PlacementController,
    pub projector: OverlayProjector,
    pub viewport: Viewport,
    loop_running: bool,
    frames: u64,
}

impl ArSessionState {
    pub fn new(config: &HoloConfig, viewport: Viewport) -> Self {
        Self {
            session: SessionController::new(),
            tracker: HitTestTracker::new(),
            placement: PlacementController::new(config.hologram_visual(), config.hover),
            projector: OverlayProjector::new(config.overlay),
            viewport,
            loop_running: false,
            frames: 0,
        }
    }

    /// Whether the frame loop is armed.
    pub fn loop_running(&self) -> bool {
        self.loop_running
    }

    /// Overlay should be shown iff an anchor exists and the session is live.
    pub fn overlay_visible(&self) -> bool {
        self.placement.is_placed() && self.session.is_active()
    }

    /// Frames processed while the loop was running.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }
}

/// The app: owned state plus the host collaborators it drives.
pub struct ArApp<P, R, O, S> {
    provider: P,
    renderer: R,
    overlay: O,
    status: S,
    reticle: Reticle,
    state: ArSessionState,
    notices: Vec<AppNotice>,
}

impl<P, R, O, S> ArApp<P, R, O, S>
where
    P: ArProvider,
    R: SceneRenderer,
    O: OverlaySurface,
    S: StatusLine,
{
    pub fn new(
        provider: P,
        renderer: R,
        mut overlay: O,
        status: S,
        config: &HoloConfig,
        viewport: Viewport,
    ) -> Self {
        let mut renderer = renderer;
        overlay.set_source(&config.secure_target_url());
        overlay.hide();
        renderer.resize(viewport);
        Self {
            provider,
            renderer,
            overlay,
            status,
            reticle: Reticle::default(),
            state: ArSessionState::new(config, viewport),
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &ArSessionState {
        &self.state
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    /// Drain notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<AppNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Check support and, when supported, try to start straight away.
    ///
    /// Unsupported platforms stop here with a status message; `start` is never
    /// attempted.
    pub async fn boot(&mut self) -> Capability {
        let capability = self
            .state
            .session
            .check_capability(&self.provider, &mut self.status)
            .await;
        self.notices.push(AppNotice::CapabilityChecked { capability });
        if capability == Capability::Supported {
            // Failures are already reported through status and notices.
            let _ = self.start().await;
        }
        capability
    }

    /// Request a session; arms the frame loop once every setup step succeeded.
    pub async fn start(&mut self) -> Result<StartOutcome, SessionError> {
        let result = self
            .state
            .session
            .start(&mut self.provider, &mut self.status)
            .await;
        self.drain_session_events();
        match &result {
            Ok(StartOutcome::Started(_)) => {
                self.state.tracker.reset();
                self.state.projector.reset();
                self.sync_overlay();
                self.state.loop_running = true;
            }
            Ok(StartOutcome::AlreadyActive) => {}
            Err(err) => {
                self.notices.push(AppNotice::StartFailed {
                    error: err.to_string(),
                    awaiting_gesture: self.state.session.state() == SessionState::AwaitingGesture,
                });
            }
        }
        result
    }

    /// End the session from the app side.
    pub fn end(&mut self) {
        self.end_session(EndReason::Local);
    }

    fn end_session(&mut self, reason: EndReason) {
        // Stop the loop before anything it reads is released.
        self.state.loop_running = false;

        self.state
            .session
            .end(&mut self.provider, &mut self.status, reason);
        self.drain_session_events();
        self.state.tracker.reset();
        self.renderer.set_reticle(&self.reticle, None);
        self.state.placement.clear(&mut self.renderer);
        self.state.projector.reset();
        self.sync_overlay();
    }

    fn drain_session_events(&mut self) {
        for event in self.state.session.take_events() {
            self.notices.push(match event {
                SessionEvent::Started(active) => AppNotice::SessionStarted {
                    session: active.handle,
                },
                SessionEvent::Ended { handle, reason } => AppNotice::SessionEnded {
                    session: handle,
                    reason,
                },
            });
        }
    }

    /// Dispatch one host event.
    pub async fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        debug!(channel = event.channel(), "event");
        match event {
            AppEvent::Select => self.on_select()?,
            AppEvent::PointerDown => {
                if self.state.session.take_gesture_retry() {
                    info!("retrying session start after user gesture");
                    self.notices.push(AppNotice::GestureRetry);
                    // Failures are already reported through status and notices.
                    let _ = self.start().await;
                }
            }
            AppEvent::Resize { .. } => {
                let viewport = event.viewport().unwrap_or(self.state.viewport);
                self.state.viewport = viewport;
                self.renderer.resize(viewport);
                self.notices.push(AppNotice::Resized {
                    width: viewport.width,
                    height: viewport.height,
                });
            }
            AppEvent::SessionEnd => self.end_session(EndReason::Provider),
        }
        Ok(())
    }

    fn on_select(&mut self) -> Result<()> {
        if !self.state.loop_running {
            return Ok(());
        }
        match self
            .state
            .placement
            .on_select(&self.state.tracker, &mut self.renderer)?
        {
            Some(trigger) => self.after_placement(trigger),
            None => self.notices.push(AppNotice::SelectIgnored),
        }
        Ok(())
    }

    /// Per-frame callback. Frames arriving while the loop is stopped are dropped.
    pub fn frame<F>(&mut self, frame: &F) -> Result<()>
    where
        F: XrFrame + ?Sized,
    {
        if !self.state.loop_running {
            self.notices.push(AppNotice::FrameDropped);
            return Ok(());
        }
        let Some(active) = self.state.session.active().copied() else {
            warn!("frame loop running without a session; stopping it");
            self.state.loop_running = false;
            return Ok(());
        };
        self.state.frames += 1;

        if let Some(viewer) = frame.viewer_pose(&active.reference_space) {
            self.renderer.set_viewer_pose(&viewer);
        }

        self.state
            .tracker
            .update(frame, &active.hit_test_source, &active.reference_space);
        self.renderer
            .set_reticle(&self.reticle, self.state.tracker.reticle_matrix());

        if let Some(trigger) = self
            .state
            .placement
            .on_frame(&self.state.tracker, &mut self.renderer)?
        {
            self.after_placement(trigger);
        }

        self.animate_and_project(frame.time());
        self.renderer.render();
        Ok(())
    }

    fn after_placement(&mut self, trigger: PlacementTrigger) {
        if let Some(anchor) = self.state.placement.anchor() {
            self.notices.push(AppNotice::Placed {
                trigger,
                position: anchor.placed.position.to_array(),
            });
        }
        self.sync_overlay();
    }

    fn animate_and_project(&mut self, time: FrameTime) {
        let Some(displayed) = self.state.placement.animate(time, &mut self.renderer) else {
            return;
        };
        if !self.state.overlay_visible() {
            return;
        }

        let world = self
            .state
            .placement
            .anchor()
            .and_then(|anchor| self.renderer.group_world_matrix(anchor.group))
            .map(|matrix| matrix.w_axis.truncate())
            .unwrap_or(displayed.position);
        self.project_overlay(world);
    }

    fn project_overlay(&mut self, world: Vec3) {
        let rig = self.renderer.cameras();
        if let Some(placement) =
            self.state
                .projector
                .update(world, &rig, self.state.viewport, &mut self.overlay)
        {
            self.notices.push(AppNotice::OverlayMoved {
                x: placement.x,
                y: placement.y,
                scale: placement.scale,
            });
        }
    }

    /// Bring the overlay surface in line with the visibility invariant.
    fn sync_overlay(&mut self) {
        let want = self.state.overlay_visible();
        if want == self.overlay.is_visible() {
            return;
        }
        if want {
            self.overlay.show();
            self.notices.push(AppNotice::OverlayShown);
        } else {
            self.overlay.hide();
            self.notices.push(AppNotice::OverlayHidden);
        }
    }
}
