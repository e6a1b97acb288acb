#![warn(missing_docs)]
//! Simulated collaborators and deterministic log sinks for headless runs and tests.
//!
//! Every simulated collaborator records what was asked of it so tests can
//! assert on call counts and the exact values handed across each seam.

mod frame;
mod metrics;
mod provider;
mod renderer;
mod surface;

use anyhow::Result;
use holoanchor_core::FrameTime;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use frame::*;
pub use metrics::*;
pub use provider::*;
pub use renderer::*;
pub use surface::*;

/// Primary event record captured by headless runs.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Frame counter when the event occurred.
    pub frame: u64,
    /// Frame timestamp.
    pub time: FrameTime,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form structured payload.
    pub payload: serde_json::Value,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}
