use qlm_core::{Block, Label, Stimulus};

use crate::config::{ExperimentConfig, Timing};
use crate::trial::{FinishHook, Input, SliderItem, Stage, StartHook, TrialDescriptor};

/// Ratio buttons offered on perception trials, left label share first.
pub const RATIO_CHOICES: [&str; 5] = ["10:90", "30:70", "50:50", "70:30", "90:10"];

/// Builds trial descriptors from object names and labels.
#[derive(Debug, Clone)]
pub struct TrialFactory {
    image_dir: String,
    image_extension: String,
    timing: Timing,
}

impl TrialFactory {
    pub fn new(config: &ExperimentConfig) -> Self {
        Self {
            image_dir: config.image_dir.clone(),
            image_extension: config.image_extension.clone(),
            timing: config.timing.clone(),
        }
    }

    pub fn image(&self, object: &str) -> Stimulus {
        Stimulus::image(&self.image_dir, object, &self.image_extension)
    }

    /// Object alone with a blank caption, then object plus `label`.
    /// Only the labelled stage is tagged and saved.
    pub fn observation(&self, object: &str, label: &str) -> TrialDescriptor {
        TrialDescriptor::new(
            self.image(object),
            vec![
                Stage::new(Input::None)
                    .with_prompt("")
                    .with_duration(self.timing.blank()),
                Stage::new(Input::None)
                    .with_prompt(label)
                    .with_duration(self.timing.label())
                    .with_block(Block::Observation)
                    .on_finish(FinishHook::Persist),
            ],
        )
    }

    /// Participant picks one of `labels` (order shuffled per presentation),
    /// then clicks the picked label again on its own.
    pub fn production(&self, object: &str, labels: &[Label]) -> TrialDescriptor {
        TrialDescriptor::new(
            self.image(object),
            vec![
                Stage::new(Input::Buttons(labels.to_vec()))
                    .with_block(Block::Production)
                    .on_start(StartHook::ShuffleChoices)
                    .on_finish(FinishHook::ResolveAndPersist),
                Stage::new(Input::Buttons(Vec::new())).on_start(StartHook::ConfirmSelection),
            ],
        )
    }

    pub fn perception(&self, object: &str, labels: &[Label]) -> TrialDescriptor {
        TrialDescriptor::new(
            self.image(object),
            vec![
                Stage::new(Input::Buttons(
                    RATIO_CHOICES.iter().map(|c| c.to_string()).collect(),
                ))
                .with_prompt(labels.join(", "))
                .with_block(Block::Perception)
                .on_finish(FinishHook::Persist),
            ],
        )
    }

    /// Practice slider, not saved.
    pub fn slider_example(
        &self,
        object: &str,
        left: &str,
        right: &str,
        prompt: &str,
    ) -> TrialDescriptor {
        TrialDescriptor::new(
            self.image(object),
            vec![
                Stage::new(Input::Slider {
                    left: left.to_string(),
                    right: right.to_string(),
                })
                .with_prompt(prompt),
            ],
        )
    }

    /// One screen with a slider per `(object, [left, right])` pair.
    ///
    /// The stimulus id lists the objects joined with `;` in slider order, so
    /// a saved line maps each value back to its object.
    pub fn slider_panel<'a>(
        &self,
        items: impl IntoIterator<Item = (&'a str, &'a [Label])>,
        prompt: &str,
    ) -> TrialDescriptor {
        let (objects, items): (Vec<&str>, Vec<SliderItem>) = items
            .into_iter()
            .filter_map(|(object, labels)| match labels {
                [left, right] => Some((
                    object,
                    SliderItem {
                        stimulus: self.image(object),
                        left: left.clone(),
                        right: right.clone(),
                    },
                )),
                _ => None,
            })
            .unzip();

        TrialDescriptor::new(
            Stimulus::text(objects.join(";")),
            vec![
                Stage::new(Input::SliderPanel(items))
                    .with_prompt(prompt)
                    .with_block(Block::Perception)
                    .on_finish(FinishHook::Persist),
            ],
        )
    }

    /// Fixed instruction screen with a single button.
    pub fn screen(&self, text: &str, button: &str) -> TrialDescriptor {
        TrialDescriptor::new(
            Stimulus::text(text),
            vec![Stage::new(Input::Buttons(vec![button.to_string()]))],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn factory() -> TrialFactory {
        TrialFactory::new(&ExperimentConfig::default())
    }

    #[test]
    fn observation_has_blank_then_labelled_stage() {
        let trial = factory().observation("object4", "buv");
        assert_eq!(trial.stimulus.id(), "images/object4.jpg");
        assert_eq!(trial.stages.len(), 2);

        let blank = &trial.stages[0];
        assert_eq!(blank.duration, Some(Duration::from_millis(1000)));
        assert_eq!(blank.prompt.as_deref(), Some(""));
        assert_eq!(blank.block, None);
        assert_eq!(blank.on_finish, None);

        let labelled = &trial.stages[1];
        assert_eq!(labelled.duration, Some(Duration::from_millis(2000)));
        assert_eq!(labelled.prompt.as_deref(), Some("buv"));
        assert_eq!(labelled.block, Some(Block::Observation));
        assert_eq!(labelled.on_finish, Some(FinishHook::Persist));
        assert_eq!(trial.timed_duration(), Duration::from_millis(3000));
    }

    #[test]
    fn production_selects_then_confirms() {
        let labels = vec!["buv".to_string(), "cal".to_string()];
        let trial = factory().production("object4", &labels);
        assert_eq!(trial.block(), Some(Block::Production));

        let select = &trial.stages[0];
        assert_eq!(select.input, Input::Buttons(labels));
        assert_eq!(select.on_start, Some(StartHook::ShuffleChoices));
        assert_eq!(select.on_finish, Some(FinishHook::ResolveAndPersist));
        assert_eq!(select.duration, None);

        let confirm = &trial.stages[1];
        assert_eq!(confirm.on_start, Some(StartHook::ConfirmSelection));
        assert_eq!(confirm.on_finish, None);
        assert_eq!(confirm.block, None);
    }

    #[test]
    fn slider_panel_skips_items_without_two_labels() {
        let pair = vec!["qar".to_string(), "tas".to_string()];
        let single = vec!["fep".to_string()];
        let trial = factory().slider_panel(
            [("object2", pair.as_slice()), ("object1", single.as_slice())],
            "rate, please",
        );
        assert_eq!(trial.stimulus.id(), "object2");
        assert_eq!(trial.stages[0].prompt.as_deref(), Some("rate, please"));
        match &trial.stages[0].input {
            Input::SliderPanel(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].left, "qar");
                assert_eq!(items[0].right, "tas");
            }
            other => panic!("unexpected input {other:?}"),
        }
    }
}
