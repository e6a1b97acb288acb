use anyhow::Result;
use holoanchor::config::HoloConfig;
use holoanchor::headless::{self, HeadlessConfig};
use holoanchor_testkit::RunResult;
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    // WARN by default; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting holoanchor v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let Some(scenario) = cli.scenario else {
        anyhow::bail!("--scenario <file.json> is required");
    };
    let config = match &cli.config {
        Some(path) => HoloConfig::load_from_path(path),
        None => HoloConfig::load(),
    };

    let report = headless::run(HeadlessConfig {
        config,
        scenario,
        event_log: cli.event_log,
        report: cli.report,
        width: cli.resolution.0,
        height: cli.resolution.1,
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.result == RunResult::Aborted {
        anyhow::bail!("scenario '{}' aborted", report.scenario);
    }
    Ok(())
}

#[derive(Clone)]
struct CliOptions {
    scenario: Option<PathBuf>,
    config: Option<PathBuf>,
    event_log: Option<PathBuf>,
    report: Option<PathBuf>,
    resolution: (u32, u32),
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            scenario: None,
            config: None,
            event_log: None,
            report: None,
            resolution: (1280, 720),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--scenario" => {
                    if let Some(path) = args.next() {
                        opts.scenario = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--scenario requires a file path");
                    }
                }
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--event-log" => {
                    if let Some(path) = args.next() {
                        opts.event_log = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--event-log requires a file path");
                    }
                }
                "--report" => {
                    if let Some(path) = args.next() {
                        opts.report = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--report requires a file path");
                    }
                }
                "--resolution" => {
                    if let Some(raw) = args.next() {
                        match raw.split_once('x') {
                            Some((w, h)) => match (w.parse::<u32>(), h.parse::<u32>()) {
                                (Ok(width), Ok(height)) if width > 0 && height > 0 => {
                                    opts.resolution = (width, height);
                                }
                                _ => {
                                    tracing::error!(value = %raw, "--resolution must be like 1280x720");
                                }
                            },
                            None => {
                                tracing::error!(value = %raw, "--resolution must be like 1280x720");
                            }
                        }
                    } else {
                        tracing::error!("--resolution requires a value like 1280x720");
                    }
                }
                other => tracing::warn!(arg = %other, "unknown argument ignored"),
            }
        }

        opts
    }
}
