//! The placed hologram: its visual payload, placement state machine and hover animation.
//!
//! The hologram is a flat panel standing on a detected surface. This crate owns
//! the decisions about *where* it stands and *when* it moves; drawing is left to
//! whatever implements [`SceneRenderer`].
//!
//! # Example
//!
//! ```rust,no_run
//! use holoanchor_hologram::{HologramVisual, HoverAnimation, PlacementController};
//!
//! let mut placement = PlacementController::new(HologramVisual::default(), HoverAnimation::default());
//!
//! // In the frame callback, after the tracker ran:
//! // placement.on_frame(&tracker, &mut renderer);
//! // placement.animate(frame_time, &mut renderer);
//! ```

pub mod animation;
pub mod placement;
pub mod renderer;
pub mod visual;

// Re-export commonly used types
pub use animation::{HoverAnimation, HoverSample};
pub use placement::{Anchor, PlacementController, PlacementTrigger};
pub use renderer::SceneRenderer;
pub use visual::{HologramVisual, LabelTexture, PanelLayer, Reticle, Stand};
