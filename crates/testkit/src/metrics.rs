//! Run report written at the end of a headless scenario.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Overall run outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunResult {
    /// Scenario ran to completion
    Completed,
    /// Scenario aborted with an error
    Aborted,
}

/// Lifecycle and placement counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Frames delivered by the script
    pub frames: u64,
    /// Frames actually processed (loop running)
    pub frames_processed: u64,
    /// Session requests issued to the provider
    pub session_requests: u64,
    /// Sessions that became active
    pub sessions_started: u64,
    /// Sessions that ended
    pub sessions_ended: u64,
    /// Automatic placements
    pub auto_placements: u64,
    /// Selection placements
    pub select_placements: u64,
    /// Selections ignored for lack of a surface
    pub selects_ignored: u64,
    /// Overlay transforms applied
    pub overlay_updates: u64,
}

/// Top-level report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Scenario identifier
    pub scenario: String,
    /// Timestamp when the report was built (RFC 3339)
    pub timestamp: String,
    /// Outcome
    pub result: RunResult,
    /// Final session state name
    pub final_state: String,
    /// Counters
    pub counters: RunCounters,
}

impl RunReport {
    /// Build a report stamped with the current time
    pub fn new(
        scenario: impl Into<String>,
        result: RunResult,
        final_state: impl Into<String>,
        counters: RunCounters,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            result,
            final_state: final_state.into(),
            counters,
        }
    }
}

/// Sink for writing run reports to JSON files
pub struct ReportSink {
    path: std::path::PathBuf,
}

impl ReportSink {
    /// Create a new sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Write the report to file
    pub fn write(&self, report: &RunReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn run_report_roundtrip() {
        let counters = RunCounters {
            frames: 10,
            frames_processed: 9,
            session_requests: 2,
            sessions_started: 1,
            auto_placements: 1,
            ..Default::default()
        };
        let report = RunReport::new("smoke", RunResult::Completed, "active", counters.clone());

        let path = std::env::temp_dir().join(format!(
            "holoanchor-report-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let sink = ReportSink::create(&path).expect("sink create");
        sink.write(&report).expect("write succeeds");

        let contents = fs::read_to_string(&path).expect("file readable");
        let parsed: RunReport = serde_json::from_str(&contents).expect("valid json");
        assert_eq!(parsed.counters, counters);
        assert_eq!(parsed.result, RunResult::Completed);
        assert!(contents.contains("\"completed\""));
        let _ = fs::remove_file(&path);
    }
}
