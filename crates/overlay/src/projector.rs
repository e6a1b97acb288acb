//! World-to-screen projection of the anchor for overlay placement.

use crate::surface::OverlaySurface;
use glam::Vec3;
use holoanchor_camera::{Camera, CameraRig};
use holoanchor_core::Viewport;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Distance-to-scale mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Distances below this are treated as this, so `1/d` stays finite.
    pub min_distance: f32,
    /// Smallest overlay scale, reached far away.
    pub min_scale: f32,
    /// Largest overlay scale, reached up close.
    pub max_scale: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.1,
            min_scale: 0.35,
            max_scale: 1.2,
        }
    }
}

impl ProjectionConfig {
    /// Uniform overlay scale for an anchor `distance` metres away.
    pub fn scale_for_distance(&self, distance: f32) -> f32 {
        (1.0 / distance.max(self.min_distance)).clamp(self.min_scale, self.max_scale)
    }
}

/// Where and how large the overlay is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    /// Horizontal pixel position of the overlay centre.
    pub x: f32,
    /// Vertical pixel position of the overlay centre (grows downward).
    pub y: f32,
    /// Uniform scale factor.
    pub scale: f32,
    /// Camera-to-anchor distance in metres.
    pub distance: f32,
}

impl OverlayPlacement {
    /// CSS transform centring the element on `(x, y)` and scaling it.
    pub fn css_transform(&self) -> String {
        format!(
            "translate(-50%, -50%) translate({}px, {}px) scale({})",
            self.x, self.y, self.scale
        )
    }
}

/// Keeps the overlay pinned to the anchor on screen.
#[derive(Debug, Clone, Default)]
pub struct OverlayProjector {
    config: ProjectionConfig,
    last: Option<OverlayPlacement>,
}

impl OverlayProjector {
    /// A projector with the given scale mapping.
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config, last: None }
    }

    /// Scale mapping in use.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// The placement most recently applied to a surface.
    pub fn last_placement(&self) -> Option<OverlayPlacement> {
        self.last
    }

    /// Project `world` through `camera` into a `viewport`.
    ///
    /// `None` when the point is behind the camera.
    pub fn project(
        &self,
        world: Vec3,
        camera: &Camera,
        viewport: Viewport,
    ) -> Option<OverlayPlacement> {
        let distance = camera.distance_to(world);
        let ndc = camera.project(world)?;

        let x = (ndc.x * 0.5 + 0.5) * viewport.width as f32;
        // NDC y points up, screen y points down
        let y = (-ndc.y * 0.5 + 0.5) * viewport.height as f32;

        Some(OverlayPlacement {
            x,
            y,
            scale: self.config.scale_for_distance(distance),
            distance,
        })
    }

    /// Project the anchor through the rig's screen camera and move the surface.
    ///
    /// Does nothing while the surface is hidden. When the anchor is behind the
    /// camera the surface keeps its previous transform.
    pub fn update<S>(
        &mut self,
        anchor_world: Vec3,
        rig: &CameraRig,
        viewport: Viewport,
        surface: &mut S,
    ) -> Option<OverlayPlacement>
    where
        S: OverlaySurface + ?Sized,
    {
        if !surface.is_visible() {
            return None;
        }
        let placement = self.project(anchor_world, rig.screen_camera(), viewport)?;
        trace!(x = placement.x, y = placement.y, scale = placement.scale, "overlay moved");
        surface.set_transform(&placement.css_transform());
        self.last = Some(placement);
        Some(placement)
    }

    /// Forget the last placement (session ended).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Surface {
        visible: bool,
        transforms: Vec<String>,
    }

    impl OverlaySurface for Surface {
        fn show(&mut self) {
            self.visible = true;
        }
        fn hide(&mut self) {
            self.visible = false;
        }
        fn is_visible(&self) -> bool {
            self.visible
        }
        fn set_transform(&mut self, css: &str) {
            self.transforms.push(css.to_string());
        }
        fn set_source(&mut self, _url: &str) {}
    }

    #[test]
    fn anchor_straight_ahead_lands_at_viewport_center() {
        let projector = OverlayProjector::default();
        let viewport = Viewport::new(800, 600);
        let placement = projector
            .project(Vec3::new(0.0, 0.0, -1.0), &Camera::default(), viewport)
            .expect("in front");
        assert!((placement.x - 400.0).abs() < 1e-3);
        assert!((placement.y - 300.0).abs() < 1e-3);
        assert!((placement.scale - 1.0).abs() < 1e-6);
        assert!((placement.distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn near_distances_are_floored_then_clamped() {
        let config = ProjectionConfig::default();
        assert_eq!(config.scale_for_distance(0.02), 1.2);
        assert_eq!(config.scale_for_distance(0.0), 1.2);
        assert_eq!(config.scale_for_distance(100.0), 0.35);
        assert!((config.scale_for_distance(2.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn point_above_center_maps_to_upper_half() {
        let projector = OverlayProjector::default();
        let placement = projector
            .project(Vec3::new(0.0, 0.3, -1.0), &Camera::default(), Viewport::new(800, 600))
            .expect("in front");
        assert!(placement.y < 300.0);
        assert!((placement.x - 400.0).abs() < 1e-3);
    }

    #[test]
    fn css_transform_format() {
        let placement = OverlayPlacement {
            x: 400.0,
            y: 300.5,
            scale: 1.0,
            distance: 1.0,
        };
        assert_eq!(
            placement.css_transform(),
            "translate(-50%, -50%) translate(400px, 300.5px) scale(1)"
        );
    }

    #[test]
    fn hidden_surface_is_not_touched() {
        let mut projector = OverlayProjector::default();
        let mut surface = Surface::default();
        let rig = CameraRig::mono(Camera::default());
        let out = projector.update(Vec3::new(0.0, 0.0, -1.0), &rig, Viewport::default(), &mut surface);
        assert!(out.is_none());
        assert!(surface.transforms.is_empty());
    }

    #[test]
    fn behind_camera_keeps_previous_transform() {
        let mut projector = OverlayProjector::default();
        let mut surface = Surface {
            visible: true,
            ..Default::default()
        };
        let rig = CameraRig::mono(Camera::default());
        projector.update(Vec3::new(0.0, 0.0, -1.0), &rig, Viewport::default(), &mut surface);
        projector.update(Vec3::new(0.0, 0.0, 2.0), &rig, Viewport::default(), &mut surface);
        assert_eq!(surface.transforms.len(), 1);
        assert!(projector.last_placement().is_some());
    }

    #[test]
    fn stereo_rig_projects_through_first_view() {
        let mut projector = OverlayProjector::default();
        let mut surface = Surface {
            visible: true,
            ..Default::default()
        };
        let left = Camera::new(Vec3::new(-0.5, 0.0, 0.0));
        let right = Camera::new(Vec3::new(0.5, 0.0, 0.0));
        let rig = CameraRig::stereo(Camera::default(), vec![left, right]);
        let placement = projector
            .update(Vec3::new(-0.5, 0.0, -1.0), &rig, Viewport::new(800, 600), &mut surface)
            .expect("visible");
        // Straight ahead of the left eye, not the combined camera
        assert!((placement.x - 400.0).abs() < 1e-3);
    }
}
