//! Scripted scenarios: a simulated runtime plus a list of frames and inputs.

use crate::app::{AppNotice, ArApp};
use crate::config::HoloConfig;
use crate::dispatch::AppEvent;
use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use holoanchor_camera::CameraRig;
use holoanchor_core::{FrameTime, Pose, Viewport};
use holoanchor_hologram::PlacementTrigger;
use holoanchor_testkit::{
    EventRecord, JsonlSink, RecordingOverlay, RecordingRenderer, RecordingStatus, RunCounters,
    RunReport, RunResult, ScriptedFrame, SimProvider,
};
use holoanchor_xr::ProviderError;
use pollster::block_on;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{debug, info, warn};

/// App wired to the simulated collaborators.
pub type ScenarioApp = ArApp<SimProvider, RecordingRenderer, RecordingOverlay, RecordingStatus>;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub provider: ProviderScript,
    #[serde(default)]
    pub rig: RigScript,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderScript {
    pub available: bool,
    pub supported: bool,
    /// Outcomes for successive session requests; requests past the end are granted.
    pub session_outcomes: Vec<Outcome>,
}

impl Default for ProviderScript {
    fn default() -> Self {
        Self {
            available: true,
            supported: true,
            session_outcomes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Grant,
    Reject(String),
    NotSupported(String),
}

/// Camera rig of the simulated renderer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RigScript {
    /// Eye separation in metres; present means a two-view rig.
    pub eye_separation: Option<f32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PoseScript {
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl PoseScript {
    fn pose(&self) -> Pose {
        Pose::new(
            Vec3::from_array(self.position),
            Quat::from_rotation_y(self.yaw_degrees.to_radians()),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameScript {
    #[serde(default = "default_dt_ms")]
    pub dt_ms: f64,
    /// Candidates best first; `null` is a candidate whose pose does not resolve.
    #[serde(default)]
    pub hits: Vec<Option<PoseScript>>,
    #[serde(default)]
    pub viewer: Option<PoseScript>,
}

fn default_dt_ms() -> f64 {
    16.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Frame(FrameScript),
    Frames { count: u32, frame: FrameScript },
    Select,
    PointerDown,
    Resize { width: u32, height: u32 },
    /// The runtime ends the session.
    SessionEnd,
    /// The app ends the session.
    End,
}

impl Scenario {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        if scenario.steps.is_empty() {
            anyhow::bail!("scenario contains no steps");
        }
        Ok(scenario)
    }

    fn provider(&self) -> SimProvider {
        let mut provider = SimProvider::supported();
        provider.available = self.provider.available;
        provider.supported = Ok(self.provider.supported);
        for outcome in &self.provider.session_outcomes {
            provider.push_outcome(match outcome {
                Outcome::Grant => Ok(()),
                Outcome::Reject(msg) => Err(ProviderError::Rejected(msg.clone())),
                Outcome::NotSupported(msg) => Err(ProviderError::NotSupported(msg.clone())),
            });
        }
        provider
    }

    fn renderer(&self, config: &HoloConfig) -> RecordingRenderer {
        let camera = config.camera();
        let rig = match self.rig.eye_separation {
            Some(separation) => {
                let half = Vec3::X * (separation * 0.5);
                let mut left = camera.clone();
                left.position -= half;
                let mut right = camera.clone();
                right.position += half;
                CameraRig::stereo(camera, vec![left, right])
            }
            None => CameraRig::mono(camera),
        };
        RecordingRenderer::with_rig(rig)
    }
}

/// Result of a finished run.
pub struct ScenarioOutcome {
    pub report: RunReport,
    pub app: ScenarioApp,
}

/// Drives an [`ArApp`] through a [`Scenario`].
pub struct ScenarioRunner {
    scenario: Scenario,
    config: HoloConfig,
    viewport: Viewport,
    event_log: Option<JsonlSink>,
}

impl ScenarioRunner {
    pub fn new(scenario: Scenario, config: HoloConfig, viewport: Viewport) -> Self {
        Self {
            scenario,
            config,
            viewport,
            event_log: None,
        }
    }

    /// Write every app notice to `sink` as one JSON line.
    pub fn with_event_log(mut self, sink: JsonlSink) -> Self {
        self.event_log = Some(sink);
        self
    }

    pub fn run(mut self) -> Result<ScenarioOutcome> {
        let mut app = ArApp::new(
            self.scenario.provider(),
            self.scenario.renderer(&self.config),
            RecordingOverlay::default(),
            RecordingStatus::default(),
            &self.config,
            self.viewport,
        );
        let mut log = RunLog {
            sink: self.event_log.take(),
            counters: RunCounters::default(),
            frame: 0,
            time: FrameTime::ZERO,
        };

        info!(scenario = %self.scenario.name, "scenario started");
        let capability = block_on(app.boot());
        debug!(?capability, "boot finished");
        log.drain(&mut app)?;

        let mut result = RunResult::Completed;
        for (index, step) in self.scenario.steps.iter().enumerate() {
            if let Err(err) = run_step(&mut app, &mut log, step) {
                warn!(step = index, %err, "scenario aborted");
                result = RunResult::Aborted;
                break;
            }
            log.drain(&mut app)?;
        }

        log.counters.frames_processed = app.state().frames_processed();
        log.counters.session_requests = app.provider().session_requests.len() as u64;
        let report = RunReport::new(
            self.scenario.name.clone(),
            result,
            app.state().session.state().to_string(),
            log.counters,
        );
        info!(
            scenario = %report.scenario,
            result = ?report.result,
            final_state = %report.final_state,
            "scenario finished"
        );
        Ok(ScenarioOutcome { report, app })
    }
}

struct RunLog {
    sink: Option<JsonlSink>,
    counters: RunCounters,
    frame: u64,
    time: FrameTime,
}

impl RunLog {
    fn drain(&mut self, app: &mut ScenarioApp) -> Result<()> {
        for notice in app.take_notices() {
            self.count(&notice);
            if let Some(sink) = self.sink.as_mut() {
                sink.write(&EventRecord {
                    frame: self.frame,
                    time: self.time,
                    kind: notice.kind(),
                    payload: serde_json::to_value(&notice)?,
                })?;
            }
        }
        Ok(())
    }

    fn count(&mut self, notice: &AppNotice) {
        let counters = &mut self.counters;
        match notice {
            AppNotice::SessionStarted { .. } => counters.sessions_started += 1,
            AppNotice::SessionEnded { .. } => counters.sessions_ended += 1,
            AppNotice::Placed {
                trigger: PlacementTrigger::Automatic,
                ..
            } => counters.auto_placements += 1,
            AppNotice::Placed {
                trigger: PlacementTrigger::Selection,
                ..
            } => counters.select_placements += 1,
            AppNotice::SelectIgnored => counters.selects_ignored += 1,
            AppNotice::OverlayMoved { .. } => counters.overlay_updates += 1,
            _ => {}
        }
    }
}

fn run_step(app: &mut ScenarioApp, log: &mut RunLog, step: &Step) -> Result<()> {
    match step {
        Step::Frame(frame) => run_frame(app, log, frame),
        Step::Frames { count, frame } => {
            for _ in 0..*count {
                run_frame(app, log, frame)?;
                log.drain(app)?;
            }
            Ok(())
        }
        Step::Select => block_on(app.handle_event(AppEvent::Select)),
        Step::PointerDown => block_on(app.handle_event(AppEvent::PointerDown)),
        Step::Resize { width, height } => block_on(app.handle_event(AppEvent::Resize {
            width: *width,
            height: *height,
        })),
        Step::SessionEnd => {
            app.provider_mut().drop_session();
            block_on(app.handle_event(AppEvent::SessionEnd))
        }
        Step::End => {
            app.end();
            Ok(())
        }
    }
}

fn run_frame(app: &mut ScenarioApp, log: &mut RunLog, script: &FrameScript) -> Result<()> {
    log.frame += 1;
    log.time = log.time.advance(script.dt_ms);
    log.counters.frames += 1;

    let frame = ScriptedFrame {
        time: log.time,
        hits: script
            .hits
            .iter()
            .map(|hit| hit.as_ref().map(PoseScript::pose))
            .collect(),
        viewer: script.viewer.as_ref().map(PoseScript::pose),
    };
    app.frame(&frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_parse_from_json() {
        let scenario = Scenario::from_json(
            r#"{
                "name": "parse",
                "provider": { "session_outcomes": [ { "reject": "needs a user gesture" }, "grant" ] },
                "rig": { "eye_separation": 0.064 },
                "steps": [
                    { "frame": { "hits": [ { "position": [0, -1, -1], "yaw_degrees": 30 }, null ] } },
                    { "frames": { "count": 3, "frame": { "dt_ms": 33.0 } } },
                    "select",
                    "pointer_down",
                    { "resize": { "width": 390, "height": 844 } },
                    "session_end",
                    "end"
                ]
            }"#,
        )
        .expect("valid scenario");

        assert_eq!(scenario.steps.len(), 7);
        assert!(scenario.provider.available);
        assert_eq!(scenario.provider.session_outcomes.len(), 2);
        assert_eq!(scenario.rig.eye_separation, Some(0.064));
        let Step::Frame(frame) = &scenario.steps[0] else {
            panic!("expected a frame step");
        };
        assert_eq!(frame.dt_ms, 16.0);
        assert!(frame.hits[1].is_none());
        assert!(matches!(scenario.steps[1], Step::Frames { count: 3, .. }));
    }

    #[test]
    fn empty_scenarios_are_rejected() {
        let err = Scenario::from_json(r#"{ "name": "empty", "steps": [] }"#).unwrap_err();
        assert!(err.to_string().contains("no steps"));
    }

    #[test]
    fn scripted_rejections_reach_the_provider() {
        let scenario = Scenario::from_json(
            r#"{ "name": "p", "provider": { "supported": false, "session_outcomes": [ { "not_supported": "x" } ] }, "steps": [ "select" ] }"#,
        )
        .unwrap();
        let provider = scenario.provider();
        assert_eq!(provider.supported, Ok(false));
        assert_eq!(provider.session_outcomes.len(), 1);
    }
}
