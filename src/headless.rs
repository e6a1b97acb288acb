use crate::config::HoloConfig;
use crate::scenario::{Scenario, ScenarioRunner};
use anyhow::Result;
use holoanchor_core::Viewport;
use holoanchor_testkit::{JsonlSink, ReportSink, RunReport};
use std::path::PathBuf;
use tracing::info;

pub struct HeadlessConfig {
    pub config: HoloConfig,
    pub scenario: PathBuf,
    pub event_log: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunReport> {
    let scenario = Scenario::from_path(&cfg.scenario)?;
    let mut runner = ScenarioRunner::new(
        scenario,
        cfg.config,
        Viewport::new(cfg.width, cfg.height),
    );
    if let Some(path) = &cfg.event_log {
        runner = runner.with_event_log(JsonlSink::create(path)?);
    }

    let outcome = runner.run()?;

    if let Some(path) = &cfg.report {
        ReportSink::create(path)?.write(&outcome.report)?;
        info!(path = %path.display(), "report written");
    }
    Ok(outcome.report)
}
