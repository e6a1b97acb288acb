#![warn(missing_docs)]
//! Perspective cameras and camera rigs for AR viewers.

use glam::{Mat4, Quat, Vec3, Vec4};
use holoanchor_core::Pose;

/// Viewer camera with a pose and a perspective projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation; identity looks down -Z with +Y up.
    pub orientation: Quat,

    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov: 70f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.01,
            far: 20.0,
        }
    }
}

impl Camera {
    /// Create a camera at the given position, looking down -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: set the lens.
    pub fn with_lens(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self.near = near;
        self.far = far;
        self
    }

    /// Move the camera to a viewer pose, keeping the lens.
    pub fn set_pose(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.orientation = pose.orientation;
    }

    /// Get the forward direction vector (where camera is looking).
    pub fn forward(&self) -> Vec3 {
        (self.orientation * Vec3::NEG_Z).normalize()
    }

    /// Camera-to-world matrix.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio (call when the viewport resizes).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Euclidean distance from the camera to a world point.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    /// Project a world point to normalized device coordinates.
    ///
    /// Returns `None` for points at or behind the camera plane, where the
    /// perspective divide would mirror the point onto the screen.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}

/// The cameras active for the current frame.
///
/// Headsets and some handheld runtimes render through several views (one per
/// eye); `views` carries those in provider order. `combined` is the rig camera
/// itself, used when no per-view cameras exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraRig {
    /// Rig-level camera.
    pub combined: Camera,
    /// Per-view sub-cameras, in provider order.
    pub views: Vec<Camera>,
}

impl CameraRig {
    /// A rig with only a single camera.
    pub fn mono(camera: Camera) -> Self {
        Self {
            combined: camera,
            views: Vec::new(),
        }
    }

    /// A rig with per-view sub-cameras.
    pub fn stereo(combined: Camera, views: Vec<Camera>) -> Self {
        Self { combined, views }
    }

    /// The camera used for screen-space work.
    ///
    /// Always the first sub-camera when the rig has any, so projection does not
    /// jump between eyes from frame to frame.
    pub fn screen_camera(&self) -> &Camera {
        self.views.first().unwrap_or(&self.combined)
    }

    /// Propagate a viewport aspect change to every camera in the rig.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.combined.set_aspect(width, height);
        for view in &mut self.views {
            view.set_aspect(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_default_initialization() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::ZERO);
        assert!((camera.fov - 70f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.near, 0.01);
        assert_eq!(camera.far, 20.0);
    }

    #[test]
    fn camera_forward_direction() {
        let camera = Camera::default();
        let forward = camera.forward();
        // Identity orientation looks down -Z
        assert!(forward.x.abs() < 0.01);
        assert!(forward.y.abs() < 0.01);
        assert!((forward.z + 1.0).abs() < 0.01);
    }

    #[test]
    fn point_in_front_projects_to_center() {
        let camera = Camera::default();
        let ndc = camera.project(Vec3::new(0.0, 0.0, -1.0)).expect("in front");
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
    }

    #[test]
    fn point_behind_camera_is_rejected() {
        let camera = Camera::default();
        assert!(camera.project(Vec3::new(0.0, 0.0, 1.0)).is_none());
        assert!(camera.project(Vec3::ZERO).is_none());
    }

    #[test]
    fn posed_camera_follows_viewer() {
        let mut camera = Camera::default();
        camera.set_pose(&Pose::new(
            Vec3::new(0.0, 1.6, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        ));
        // Turned left 90 degrees: forward is now -X
        assert!((camera.forward() - Vec3::NEG_X).length() < 1e-5);
        let ndc = camera.project(Vec3::new(-2.0, 1.6, 0.0)).expect("in front");
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((camera.distance_to(Vec3::new(-2.0, 1.6, 0.0)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn camera_matrices_are_valid() {
        let camera = Camera::default();

        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        let view_proj = camera.view_projection_matrix();

        assert!(view.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(proj.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(view_proj.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(!proj.to_cols_array().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn rig_prefers_first_view() {
        let left = Camera::new(Vec3::new(-0.03, 0.0, 0.0));
        let right = Camera::new(Vec3::new(0.03, 0.0, 0.0));
        let rig = CameraRig::stereo(Camera::default(), vec![left.clone(), right]);
        assert_eq!(rig.screen_camera(), &left);

        let mono = CameraRig::mono(Camera::new(Vec3::Y));
        assert_eq!(mono.screen_camera().position, Vec3::Y);
    }

    #[test]
    fn rig_resize_reaches_all_views() {
        let mut rig = CameraRig::stereo(
            Camera::default(),
            vec![Camera::default(), Camera::default()],
        );
        rig.set_aspect(1000, 500);
        assert_eq!(rig.combined.aspect, 2.0);
        assert!(rig.views.iter().all(|c| c.aspect == 2.0));
    }
}
