#![warn(missing_docs)]
//! Screen-space overlay kept in registration with the placed hologram.

pub mod projector;
pub mod surface;

pub use projector::{OverlayPlacement, OverlayProjector, ProjectionConfig};
pub use surface::{normalize_secure_url, OverlaySurface};
