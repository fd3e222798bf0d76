use std::time::Duration;

use qlm_core::{Block, Label, Stimulus, TrialResult};

use crate::error::{ExperimentError, Result};
use crate::random::Randomizer;

/// One multi-stage trial. Only whole descriptors are shuffled into a run;
/// the stages inside keep their authored order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialDescriptor {
    pub stimulus: Stimulus,
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub prompt: Option<String>,
    pub input: Input,
    /// Ends the stage without input once elapsed.
    pub duration: Option<Duration>,
    pub block: Option<Block>,
    pub on_start: Option<StartHook>,
    pub on_finish: Option<FinishHook>,
}

/// What the participant can do on a stage
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    None,
    Buttons(Vec<Label>),
    /// A 0..=100 slider between two labels, starting at 50.
    Slider { left: Label, right: Label },
    SliderPanel(Vec<SliderItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderItem {
    pub stimulus: Stimulus,
    pub left: Label,
    pub right: Label,
}

/// Runs right before a stage is shown and decides the displayed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartHook {
    /// Show the buttons in a fresh random order.
    ShuffleChoices,
    /// Show the previous stage's selected label as the only button.
    ConfirmSelection,
}

/// Runs once the stage's result is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishHook {
    Persist,
    /// Record which displayed label was clicked, then persist.
    ResolveAndPersist,
}

impl Stage {
    pub fn new(input: Input) -> Self {
        Self {
            prompt: None,
            input,
            duration: None,
            block: None,
            on_start: None,
            on_finish: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    pub fn on_start(mut self, hook: StartHook) -> Self {
        self.on_start = Some(hook);
        self
    }

    pub fn on_finish(mut self, hook: FinishHook) -> Self {
        self.on_finish = Some(hook);
        self
    }

    /// Input as it will actually be displayed.
    ///
    /// The template is never modified; shuffles apply to a copy so every
    /// presentation of a repeated template gets its own order.
    pub fn prepare_input<R: Randomizer>(
        &self,
        previous: Option<&TrialResult>,
        rng: &mut R,
        trial_index: usize,
    ) -> Result<Input> {
        match self.on_start {
            None => Ok(self.input.clone()),
            Some(StartHook::ShuffleChoices) => match &self.input {
                Input::Buttons(labels) => {
                    let mut shown = labels.clone();
                    rng.shuffle(&mut shown);
                    Ok(Input::Buttons(shown))
                }
                other => Ok(other.clone()),
            },
            Some(StartHook::ConfirmSelection) => previous
                .and_then(|result| result.label_selected.clone())
                .map(|label| Input::Buttons(vec![label]))
                .ok_or(ExperimentError::MissingSelection { trial_index }),
        }
    }
}

impl Input {
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Input::None)
    }

    pub fn choices(&self) -> &[Label] {
        match self {
            Input::Buttons(labels) => labels,
            _ => &[],
        }
    }
}

impl TrialDescriptor {
    pub fn new(stimulus: Stimulus, stages: Vec<Stage>) -> Self {
        Self { stimulus, stages }
    }

    /// Total fixed display time of the timed stages.
    pub fn timed_duration(&self) -> Duration {
        self.stages.iter().filter_map(|s| s.duration).sum()
    }

    pub fn block(&self) -> Option<Block> {
        self.stages.iter().find_map(|s| s.block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlm_core::Response;

    struct Reverse;

    impl Randomizer for Reverse {
        fn shuffle<T>(&mut self, items: &mut [T]) {
            items.reverse();
        }
    }

    fn buttons(labels: &[&str]) -> Input {
        Input::Buttons(labels.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn shuffle_applies_to_a_copy() {
        let stage = Stage::new(buttons(&["buv", "cal"])).on_start(StartHook::ShuffleChoices);
        let shown = stage.prepare_input(None, &mut Reverse, 0).unwrap();
        assert_eq!(shown, buttons(&["cal", "buv"]));
        assert_eq!(stage.input, buttons(&["buv", "cal"]));
    }

    #[test]
    fn confirmation_shows_previous_selection() {
        let previous = TrialResult {
            block: Some(Block::Production),
            trial_index: 4,
            time_elapsed_ms: 0,
            stimulus: "images/object1.jpg".into(),
            choices: vec!["pax".into(), "fep".into()],
            label_selected: Some("pax".into()),
            response: Response::Button(0),
            rt_ms: Some(800),
            slider_values: Vec::new(),
        };
        let stage = Stage::new(Input::Buttons(Vec::new())).on_start(StartHook::ConfirmSelection);
        let shown = stage.prepare_input(Some(&previous), &mut Reverse, 5).unwrap();
        assert_eq!(shown, buttons(&["pax"]));
    }

    #[test]
    fn confirmation_without_previous_is_an_error() {
        let stage = Stage::new(Input::Buttons(Vec::new())).on_start(StartHook::ConfirmSelection);
        let err = stage.prepare_input(None, &mut Reverse, 9).unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::MissingSelection { trial_index: 9 }
        ));
    }
}
