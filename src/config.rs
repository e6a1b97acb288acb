use anyhow::Result;
use holoanchor_camera::Camera;
use holoanchor_hologram::{HologramVisual, HoverAnimation};
use holoanchor_overlay::{normalize_secure_url, ProjectionConfig};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/holoanchor.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HoloConfig {
    /// Site shown in the overlay; `http://` is upgraded at startup.
    pub target_url: String,
    pub hologram: HologramConfig,
    pub camera: CameraConfig,
    pub overlay: ProjectionConfig,
    pub hover: HoverAnimation,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HologramConfig {
    /// Board width in metres.
    pub width: f32,
    /// Board height in metres.
    pub height: f32,
}

impl Default for HologramConfig {
    fn default() -> Self {
        Self {
            width: 1.2,
            height: 0.72,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            near: 0.01,
            far: 20.0,
        }
    }
}

impl Default for HoloConfig {
    fn default() -> Self {
        Self {
            target_url: "https://www.infocus1.co.kr/".to_string(),
            hologram: HologramConfig::default(),
            camera: CameraConfig::default(),
            overlay: ProjectionConfig::default(),
            hover: HoverAnimation::default(),
        }
    }
}

impl HoloConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<HoloConfig>(&contents) {
                Ok(cfg) => cfg.sanitized(),
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    HoloConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                HoloConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Overlay URL with the scheme upgraded to HTTPS.
    pub fn secure_target_url(&self) -> String {
        normalize_secure_url(&self.target_url)
    }

    /// Visual payload for the configured board size.
    pub fn hologram_visual(&self) -> HologramVisual {
        HologramVisual::new(self.hologram.width, self.hologram.height)
    }

    /// Viewer camera with the configured lens.
    pub fn camera(&self) -> Camera {
        Camera::default().with_lens(self.camera.fov_degrees, self.camera.near, self.camera.far)
    }

    /// Repair values that would break projection, warning about each one.
    fn sanitized(mut self) -> Self {
        let defaults = HoloConfig::default();
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            warn!(
                near = self.camera.near,
                far = self.camera.far,
                "invalid clip planes; using defaults"
            );
            self.camera.near = defaults.camera.near;
            self.camera.far = defaults.camera.far;
        }
        if !(self.camera.fov_degrees > 1.0 && self.camera.fov_degrees < 179.0) {
            warn!(fov = self.camera.fov_degrees, "invalid field of view; using default");
            self.camera.fov_degrees = defaults.camera.fov_degrees;
        }
        if !(self.overlay.min_distance > 0.0 && self.overlay.min_scale <= self.overlay.max_scale) {
            warn!("invalid overlay scale bounds; using defaults");
            self.overlay = defaults.overlay;
        }
        if !(self.hologram.width > 0.0 && self.hologram.height > 0.0) {
            warn!("invalid hologram size; using default");
            self.hologram = defaults.hologram;
        }
        self
    }
}
