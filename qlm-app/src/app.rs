use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use qlm_core::TrialResult;
use qlm_experiment::analysis::summarize;
use qlm_experiment::{
    ExperimentConfig, Participant, Runner, SimulatedParticipant, TrialDescriptor, build_timeline,
    results_to_csv,
};
use qlm_persist::{HttpTransport, LocalBuffer, RetryPolicy, SaveClient, SaveHandle, SaveQueue};
use qlm_timing::{HighPrecisionTimer, ManualTimer, Timer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use crate::cli::RunArgs;
use crate::participant::ConsoleParticipant;

/// One participant session: builds the timeline, runs it on a blocking
/// thread and drains the save queue before returning.
pub struct App {
    config: ExperimentConfig,
    seed: u64,
    simulate: bool,
    results: Option<PathBuf>,
}

impl App {
    pub fn new(args: RunArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => ExperimentConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ExperimentConfig::default(),
        };
        if let Some(endpoint) = args.endpoint {
            config.save.endpoint = endpoint;
        }
        if let Some(dir) = args.fallback_dir {
            config.save.fallback_dir = dir.to_string_lossy().into_owned();
        }
        config.validate().context("invalid experiment config")?;

        Ok(Self {
            config,
            seed: args.seed.unwrap_or_else(rand::random),
            simulate: args.simulate,
            results: args.results,
        })
    }

    pub async fn run(self) -> Result<()> {
        info!(
            seed = self.seed,
            simulate = self.simulate,
            endpoint = %self.config.save.endpoint,
            "session starting"
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let timeline = build_timeline(&self.config, &mut rng)?;

        let transport = HttpTransport::with_timeout(&self.config.save.endpoint, Duration::from_secs(10))
            .context("building HTTP client")?;
        let policy = RetryPolicy {
            max_attempts: self.config.save.max_attempts,
            delay: Duration::from_millis(self.config.save.retry_delay_ms),
        };
        let buffer = LocalBuffer::new(&self.config.save.fallback_dir);
        let (handle, queue) = SaveQueue::spawn(SaveClient::with_policy(transport, policy), Some(buffer));

        let data_file = self.config.data_file.clone();
        let simulate = self.simulate;
        let seed = self.seed;
        let session = tokio::task::spawn_blocking(move || {
            if simulate {
                let timer = ManualTimer::new();
                let participant =
                    SimulatedParticipant::new(timer.clone(), StdRng::seed_from_u64(seed.wrapping_add(1)));
                run_session(timer, rng, participant, handle, &data_file, &timeline)
            } else {
                let participant = ConsoleParticipant::stdio();
                run_session(HighPrecisionTimer::new(), rng, participant, handle, &data_file, &timeline)
            }
        })
        .await
        .context("session thread panicked")?;
        let (outcome, history, handle) = session;

        if !self.simulate && outcome.is_ok() {
            display_data(&mut io::stdout().lock(), &history).context("printing session data")?;
        }

        if let Some(dump) = &self.config.final_dump_file {
            handle.enqueue(dump.as_str(), results_to_csv(&history));
        }
        drop(handle);

        let report = queue.finish().await.context("save queue worker failed")?;
        if report.buffered > 0 {
            warn!(
                buffered = report.buffered,
                dir = %self.config.save.fallback_dir,
                "some lines were kept locally instead of saved"
            );
        }
        if report.lost > 0 {
            error!(lost = report.lost, "some lines could not be saved at all");
        }

        let summary = summarize(&history);
        info!(
            stages = summary.stages,
            observations = summary.observations,
            summary = %serde_json::to_string(&summary)?,
            "session summary"
        );

        if let Some(path) = &self.results {
            let json = serde_json::to_string_pretty(&history)?;
            std::fs::write(path, json)
                .with_context(|| format!("writing results to {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }

        outcome.context("session aborted")
    }
}

/// Shows the participant their own data once the closing screen is done.
fn display_data<W: Write>(out: &mut W, history: &[TrialResult]) -> io::Result<()> {
    writeln!(out)?;
    out.write_all(results_to_csv(history).as_bytes())?;
    out.flush()
}

/// Runs the timeline to completion or first error, always handing back
/// whatever was recorded along with the save handle.
fn run_session<T: Timer, P: Participant>(
    timer: T,
    rng: StdRng,
    participant: P,
    handle: SaveHandle,
    data_file: &str,
    timeline: &[TrialDescriptor],
) -> (qlm_experiment::Result<()>, Vec<TrialResult>, SaveHandle) {
    let mut runner = Runner::new(timer, rng, participant, handle, data_file);
    let outcome = runner.run(timeline);
    let (history, handle) = runner.into_parts();
    (outcome, history, handle)
}
