//! Surface-anchored AR hologram with a screen-projected overlay.
//!
//! The placement core lives in the workspace crates; this crate owns the
//! application state, event dispatch, configuration and the headless
//! scenario runner.

pub mod app;
pub mod config;
pub mod dispatch;
pub mod headless;
pub mod scenario;

pub use app::{AppNotice, ArApp, ArSessionState};
pub use config::HoloConfig;
pub use dispatch::{AppEvent, Delivery};
pub use scenario::{Scenario, ScenarioOutcome, ScenarioRunner};
