//! Scene renderer seam.

use crate::visual::{HologramVisual, Reticle};
use anyhow::Result;
use glam::Mat4;
use holoanchor_camera::CameraRig;
use holoanchor_core::{GroupId, Pose, Transform, Viewport};

/// Scene-graph operations the placement core needs from the rendering library.
pub trait SceneRenderer {
    /// Build the hologram's meshes and insert the group into the scene.
    fn create_group(&mut self, visual: &HologramVisual) -> Result<GroupId>;

    /// Remove a group from the scene and release its meshes and textures.
    fn destroy_group(&mut self, group: GroupId);

    /// Overwrite a group's local transform.
    fn set_group_transform(&mut self, group: GroupId, transform: &Transform);

    /// World matrix of a group after its latest transform.
    fn group_world_matrix(&self, group: GroupId) -> Option<Mat4>;

    /// Set the glow layer's opacity.
    fn set_glow_opacity(&mut self, group: GroupId, opacity: f32);

    /// Show the reticle at `matrix`, or hide it with `None`.
    fn set_reticle(&mut self, reticle: &Reticle, matrix: Option<Mat4>);

    /// Cameras active for this frame.
    fn cameras(&self) -> CameraRig;

    /// Move the cameras to the tracked viewer pose.
    fn set_viewer_pose(&mut self, pose: &Pose);

    /// Resize the drawing surface and update camera aspect.
    fn resize(&mut self, viewport: Viewport);

    /// Draw the scene through the active cameras.
    fn render(&mut self);
}
