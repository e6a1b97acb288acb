//! Hologram visual payload - the layered panel and its stand

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Additive or normal blending for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blending {
    /// Standard alpha blending
    Normal,
    /// Light-adding blend used for glows
    Additive,
}

/// One flat quad of the hologram stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelLayer {
    /// Quad size (width, height) in metres
    pub size: (f32, f32),
    /// Offset from the group origin
    pub offset: Vec3,
    /// Color (RGBA)
    pub color: [f32; 4],
    /// Blend mode
    pub blending: Blending,
    /// Render both faces
    pub double_sided: bool,
    /// Draw order among transparent layers; higher draws later
    pub render_order: i32,
}

impl PanelLayer {
    fn new(size: (f32, f32), z: f32, color: [f32; 4]) -> Self {
        Self {
            size,
            offset: Vec3::new(0.0, 0.0, z),
            color,
            blending: Blending::Normal,
            double_sided: false,
            render_order: 0,
        }
    }

    fn drawn_after(mut self, render_order: i32) -> Self {
        self.render_order = render_order;
        self
    }

    fn glowing(mut self) -> Self {
        self.blending = Blending::Additive;
        self.double_sided = true;
        self
    }
}

/// Texture painted onto the label layer
///
/// Only the canvas dimensions and alpha cutoff are fixed here; the drawing
/// itself is up to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTexture {
    /// Canvas size in pixels
    pub canvas: (u32, u32),
    /// Anisotropic filtering level
    pub anisotropy: u8,
    /// Fragments below this alpha are discarded
    pub alpha_test: f32,
}

impl Default for LabelTexture {
    fn default() -> Self {
        Self {
            canvas: (1024, 640),
            anisotropy: 4,
            alpha_test: 0.02,
        }
    }
}

/// Cylinder the panel stands on, plus the glowing ring at its foot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stand {
    /// Cylinder radius
    pub radius: f32,
    /// Cylinder height
    pub height: f32,
    /// Cylinder centre relative to the group origin
    pub offset: Vec3,
    /// Cylinder color
    pub color: [f32; 4],
    /// Ring inner/outer radius
    pub ring_radii: (f32, f32),
    /// Ring centre relative to the group origin
    pub ring_offset: Vec3,
    /// Ring color
    pub ring_color: [f32; 4],
    /// Ring blend mode
    pub ring_blending: Blending,
}

/// The full visual payload handed to the renderer once per anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HologramVisual {
    /// Dark backing board
    pub board: PanelLayer,
    /// Thin additive rim just behind the board
    pub border: PanelLayer,
    /// Wide additive halo; its opacity is animated
    pub glow: PanelLayer,
    /// Textured label in front of the board
    pub label: PanelLayer,
    /// Label texture description
    pub label_texture: LabelTexture,
    /// Stand and base glow
    pub stand: Stand,
}

const CYAN: [f32; 3] = [0x5a as f32 / 255.0, 0xf0 as f32 / 255.0, 1.0];

fn hex_rgba(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

impl HologramVisual {
    /// Build the payload for a board of `width` x `height` metres.
    pub fn new(width: f32, height: f32) -> Self {
        let cyan = |alpha| [CYAN[0], CYAN[1], CYAN[2], alpha];

        let board =
            PanelLayer::new((width, height), 0.0, hex_rgba(0x0a111a, 0.82)).drawn_after(1);
        let border =
            PanelLayer::new((width + 0.05, height + 0.05), -0.002, cyan(0.25)).glowing();
        let glow = PanelLayer::new((width + 0.25, height + 0.25), -0.08, cyan(0.22)).glowing();
        let label = PanelLayer::new((width * 0.95, height * 0.95), 0.001, [1.0; 4]);

        let stand_height = 0.08;
        let stand_y = -height / 2.0 - stand_height / 2.0;
        let stand = Stand {
            radius: 0.02,
            height: stand_height,
            offset: Vec3::new(0.0, stand_y, 0.0),
            color: hex_rgba(0x0f1925, 1.0),
            ring_radii: (0.08, 0.16),
            ring_offset: Vec3::new(0.0, stand_y - 0.04, 0.0),
            ring_color: cyan(0.32),
            ring_blending: Blending::Additive,
        };

        Self {
            board,
            border,
            glow,
            label,
            label_texture: LabelTexture::default(),
            stand,
        }
    }

    /// Board size (width, height)
    pub fn size(&self) -> (f32, f32) {
        self.board.size
    }
}

impl Default for HologramVisual {
    fn default() -> Self {
        Self::new(1.2, 0.72)
    }
}

/// Flat ring marking the current hit-test pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reticle {
    /// Inner and outer radius
    pub radii: (f32, f32),
    /// Ring color
    pub color: [f32; 4],
}

impl Default for Reticle {
    fn default() -> Self {
        Self {
            radii: (0.08, 0.12),
            color: [CYAN[0], CYAN[1], CYAN[2], 0.85],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hologram_dimensions() {
        let visual = HologramVisual::default();
        assert_eq!(visual.size(), (1.2, 0.72));
        assert!((visual.border.size.0 - 1.25).abs() < 1e-6);
        assert!((visual.glow.size.1 - 0.97).abs() < 1e-6);
        assert!((visual.label.size.0 - 1.14).abs() < 1e-6);
    }

    #[test]
    fn layers_stack_front_to_back() {
        let visual = HologramVisual::default();
        assert!(visual.label.offset.z > visual.board.offset.z);
        assert!(visual.board.offset.z > visual.border.offset.z);
        assert!(visual.border.offset.z > visual.glow.offset.z);
        assert_eq!(visual.glow.blending, Blending::Additive);
        assert_eq!(visual.board.blending, Blending::Normal);
    }

    #[test]
    fn stand_sits_under_board() {
        let visual = HologramVisual::default();
        assert!((visual.stand.offset.y + 0.40).abs() < 1e-6);
        assert!((visual.stand.ring_offset.y + 0.44).abs() < 1e-6);
    }

    #[test]
    fn board_draws_after_glows_and_base_ring_adds_light() {
        let visual = HologramVisual::default();
        assert_eq!(visual.board.render_order, 1);
        assert_eq!(visual.border.render_order, 0);
        assert_eq!(visual.glow.render_order, 0);
        assert_eq!(visual.stand.ring_blending, Blending::Additive);
        assert_eq!(visual.stand.ring_color[3], 0.32);
    }

    #[test]
    fn hex_colors_decode() {
        assert_eq!(hex_rgba(0xff0000, 0.5), [1.0, 0.0, 0.0, 0.5]);
    }
}
