//! Anchor placement state machine.
//!
//! The hologram is placed automatically once per session, on the first frame
//! the tracker offers a surface pose. After that it only moves when the user
//! selects while a surface is visible. Every placement overwrites the anchor
//! transform wholesale from the tracker pose.

use crate::animation::HoverAnimation;
use crate::renderer::SceneRenderer;
use crate::visual::HologramVisual;
use anyhow::Result;
use holoanchor_core::{FrameTime, GroupId, Transform};
use holoanchor_xr::HitTestTracker;
use serde::Serialize;
use tracing::{debug, info};

/// What caused a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlacementTrigger {
    /// First surface found this session.
    Automatic,
    /// Explicit user selection.
    Selection,
}

/// The placed hologram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Renderer group holding the visual payload.
    pub group: GroupId,
    /// Transform assigned at the latest placement.
    pub placed: Transform,
    /// Vertical position captured at placement; hover is added on top of it.
    pub base_y: f32,
    /// Transform currently shown, hover included.
    pub displayed: Transform,
}

/// Decides when the hologram is (re)anchored and keeps its hover going.
#[derive(Debug, Clone)]
pub struct PlacementController {
    visual: HologramVisual,
    animation: HoverAnimation,
    pending: bool,
    anchor: Option<Anchor>,
}

impl PlacementController {
    /// A controller waiting for its first automatic placement.
    pub fn new(visual: HologramVisual, animation: HoverAnimation) -> Self {
        Self {
            visual,
            animation,
            pending: true,
            anchor: None,
        }
    }

    /// True until the first automatic placement of the session succeeds.
    pub fn placement_pending(&self) -> bool {
        self.pending
    }

    /// The placed anchor, if any.
    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    /// Whether an anchor exists.
    pub fn is_placed(&self) -> bool {
        self.anchor.is_some()
    }

    /// Per-frame step, run after the tracker updated.
    pub fn on_frame<R>(
        &mut self,
        tracker: &HitTestTracker,
        renderer: &mut R,
    ) -> Result<Option<PlacementTrigger>>
    where
        R: SceneRenderer + ?Sized,
    {
        if !self.pending || !tracker.is_visible() {
            return Ok(None);
        }
        if self.place_from_current_pose(tracker, renderer)? {
            self.pending = false;
            info!("hologram auto-placed");
            return Ok(Some(PlacementTrigger::Automatic));
        }
        Ok(None)
    }

    /// Handle a select input. Ignored unless a surface is visible right now.
    pub fn on_select<R>(
        &mut self,
        tracker: &HitTestTracker,
        renderer: &mut R,
    ) -> Result<Option<PlacementTrigger>>
    where
        R: SceneRenderer + ?Sized,
    {
        if !tracker.is_visible() {
            debug!("select ignored: no surface");
            return Ok(None);
        }
        if self.place_from_current_pose(tracker, renderer)? {
            info!("hologram re-anchored by selection");
            return Ok(Some(PlacementTrigger::Selection));
        }
        Ok(None)
    }

    /// Anchor the hologram at the tracker's current pose.
    ///
    /// Creates the renderer group on first use. Returns `false` without side
    /// effects when the tracker has no pose to offer.
    pub fn place_from_current_pose<R>(
        &mut self,
        tracker: &HitTestTracker,
        renderer: &mut R,
    ) -> Result<bool>
    where
        R: SceneRenderer + ?Sized,
    {
        let Some(matrix) = tracker.reticle_matrix() else {
            return Ok(false);
        };

        let group = match &self.anchor {
            Some(anchor) => anchor.group,
            None => {
                let group = renderer.create_group(&self.visual)?;
                debug!(%group, "hologram group created");
                group
            }
        };

        let placed = Transform::from_matrix(&matrix);
        renderer.set_group_transform(group, &placed);
        self.anchor = Some(Anchor {
            group,
            placed,
            base_y: placed.position.y,
            displayed: placed,
        });
        Ok(true)
    }

    /// Apply hover and glow pulse for this frame.
    pub fn animate<R>(&mut self, time: FrameTime, renderer: &mut R) -> Option<Transform>
    where
        R: SceneRenderer + ?Sized,
    {
        let anchor = self.anchor.as_mut()?;
        let sample = self.animation.sample(time);
        anchor.displayed = anchor.placed.with_y(anchor.base_y + sample.offset_y);
        renderer.set_group_transform(anchor.group, &anchor.displayed);
        renderer.set_glow_opacity(anchor.group, sample.glow_opacity);
        Some(anchor.displayed)
    }

    /// Drop the anchor and release its visuals; the next session starts pending again.
    pub fn clear<R>(&mut self, renderer: &mut R)
    where
        R: SceneRenderer + ?Sized,
    {
        if let Some(anchor) = self.anchor.take() {
            renderer.destroy_group(anchor.group);
            debug!(group = %anchor.group, "hologram group destroyed");
        }
        self.pending = true;
    }
}
