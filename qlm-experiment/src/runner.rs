use std::time::Duration;

use qlm_core::{DataSink, Response, Stimulus, TrialResult};
use qlm_timing::Timer;
use tracing::{debug, info};

use crate::error::{ExperimentError, Result};
use crate::normalize::normalize;
use crate::random::Randomizer;
use crate::trial::{FinishHook, Input, Stage, TrialDescriptor};

/// One stage as presented to the participant
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    pub trial_index: usize,
    pub stimulus: &'a Stimulus,
    pub prompt: Option<&'a str>,
    pub input: &'a Input,
    /// If set, the participant may let the stage time out.
    pub duration: Option<Duration>,
}

/// Whoever answers the screens: a person at a terminal, or a simulation.
pub trait Participant {
    /// Called once for every stage, timed or not, before it runs.
    fn present(&mut self, _screen: &Screen<'_>) -> Result<()> {
        Ok(())
    }

    /// Blocks until the participant responds to an input stage.
    fn respond(&mut self, screen: &Screen<'_>) -> Result<Response>;
}

/// Walks a flat timeline one stage at a time.
///
/// Results are handed to the sink as soon as a stage finishes; the runner
/// never waits on their delivery.
pub struct Runner<T, R, P, S>
where
    T: Timer,
    R: Randomizer,
    P: Participant,
    S: DataSink,
{
    pub timer: T,
    pub rng: R,
    pub participant: P,
    pub sink: S,
    data_file: String,
    started_at: u64,
    history: Vec<TrialResult>,
}

impl<T, R, P, S> Runner<T, R, P, S>
where
    T: Timer,
    R: Randomizer,
    P: Participant,
    S: DataSink,
{
    pub fn new(timer: T, rng: R, participant: P, sink: S, data_file: impl Into<String>) -> Self {
        let started_at = timer.now();
        Self {
            timer,
            rng,
            participant,
            sink,
            data_file: data_file.into(),
            started_at,
            history: Vec::new(),
        }
    }

    pub fn run(&mut self, timeline: &[TrialDescriptor]) -> Result<()> {
        info!(trials = timeline.len(), "starting timeline");
        for (i, trial) in timeline.iter().enumerate() {
            debug!(trial = i, stimulus = %trial.stimulus, "trial started");
            self.run_trial(trial)?;
        }
        info!(
            stages = self.history.len(),
            elapsed_ms = self.elapsed_ms(),
            "timeline complete"
        );
        Ok(())
    }

    /// Runs every stage of `trial`, passing each stage's result to the next.
    pub fn run_trial(&mut self, trial: &TrialDescriptor) -> Result<()> {
        let mut previous: Option<TrialResult> = None;
        for stage in &trial.stages {
            let result = self.run_stage(&trial.stimulus, stage, previous.as_ref())?;
            previous = Some(result);
        }
        Ok(())
    }

    fn run_stage(
        &mut self,
        stimulus: &Stimulus,
        stage: &Stage,
        previous: Option<&TrialResult>,
    ) -> Result<TrialResult> {
        let trial_index = self.history.len();
        let input = stage.prepare_input(previous, &mut self.rng, trial_index)?;

        let screen = Screen {
            trial_index,
            stimulus,
            prompt: stage.prompt.as_deref(),
            input: &input,
            duration: stage.duration,
        };

        self.participant.present(&screen)?;
        let shown_at = self.timer.now();
        let response = if input.accepts_input() {
            let response = self.participant.respond(&screen)?;
            validate(&screen, &response)?;
            response
        } else {
            if let Some(duration) = stage.duration {
                self.timer.sleep(duration);
            }
            Response::Timeout
        };
        let rt_ms = (!response.is_timeout())
            .then(|| self.timer.elapsed(shown_at).as_millis() as u64);

        let slider_values = match &response {
            Response::Slider(value) => vec![*value],
            Response::Sliders(values) => values.clone(),
            _ => Vec::new(),
        };

        let mut result = TrialResult {
            block: stage.block,
            trial_index,
            time_elapsed_ms: self.elapsed_ms(),
            stimulus: stimulus.id().to_string(),
            choices: input.choices().to_vec(),
            label_selected: None,
            response,
            rt_ms,
            slider_values,
        };

        match stage.on_finish {
            Some(FinishHook::ResolveAndPersist) => {
                result.resolve_selection();
                self.persist(&result);
            }
            Some(FinishHook::Persist) => self.persist(&result),
            None => {}
        }

        debug!(
            trial_index,
            block = ?result.block,
            response = %result.response,
            rt_ms = ?result.rt_ms,
            "stage complete"
        );
        self.history.push(result.clone());
        Ok(result)
    }

    fn persist(&mut self, result: &TrialResult) {
        self.sink.append(&self.data_file, normalize(result));
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed(self.started_at).as_millis() as u64
    }

    pub fn history(&self) -> &[TrialResult] {
        &self.history
    }

    pub fn into_parts(self) -> (Vec<TrialResult>, S) {
        (self.history, self.sink)
    }
}

fn validate(screen: &Screen<'_>, response: &Response) -> Result<()> {
    let ok = match (screen.input, response) {
        (_, Response::Timeout) => screen.duration.is_some(),
        (Input::Buttons(labels), Response::Button(index)) => *index < labels.len(),
        (Input::Slider { .. }, Response::Slider(value)) => *value <= 100,
        (Input::SliderPanel(items), Response::Sliders(values)) => {
            values.len() == items.len() && values.iter().all(|v| *v <= 100)
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(ExperimentError::InvalidResponse {
            trial_index: screen.trial_index,
            response: response.clone(),
        })
    }
}
