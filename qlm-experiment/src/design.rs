use tracing::info;

use crate::config::{ExperimentConfig, PerceptionMode};
use crate::error::Result;
use crate::factory::TrialFactory;
use crate::random::Randomizer;
use crate::sequence::{self, Timeline};
use crate::trial::TrialDescriptor;

/// Assembles the full run: consent, observation, production, perception,
/// closing screen, each block preceded by its instructions.
pub fn build_timeline<R: Randomizer>(
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<Vec<TrialDescriptor>> {
    config.validate()?;
    let factory = TrialFactory::new(config);
    let text = &config.text;

    let templates: Vec<_> = config
        .observation
        .iter()
        .map(|item| factory.observation(&item.object, &item.label))
        .collect();
    let weights: Vec<_> = config.observation.iter().map(|item| item.weight).collect();
    let observation = sequence::build(&templates, &weights, rng)?;

    let templates: Vec<_> = config
        .production
        .iter()
        .map(|item| factory.production(&item.object, &item.labels))
        .collect();
    let weights: Vec<_> = config.production.iter().map(|item| item.weight).collect();
    let production = sequence::build(&templates, &weights, rng)?;

    let perception = match config.perception {
        PerceptionMode::Sliders => {
            let mut trials = Vec::new();
            if let Some(example) = &config.slider_example {
                trials.push(factory.slider_example(
                    &example.object,
                    &example.left,
                    &example.right,
                    &text.slider_example,
                ));
            }
            trials.push(factory.slider_panel(
                config
                    .production
                    .iter()
                    .map(|item| (item.object.as_str(), item.labels.as_slice())),
                &text.slider_panel,
            ));
            trials
        }
        PerceptionMode::Buttons => config
            .production
            .iter()
            .map(|item| factory.perception(&item.object, &item.labels))
            .collect(),
    };

    info!(
        observation = observation.len(),
        production = production.len(),
        perception = perception.len(),
        "built timeline"
    );

    Ok(Timeline::new()
        .single(factory.screen(&text.consent, &text.consent_button))
        .single(factory.screen(&text.observation, &text.continue_button))
        .sequence(observation)
        .single(factory.screen(&text.production, &text.continue_button))
        .sequence(production)
        .single(factory.screen(&text.perception, &text.continue_button))
        .sequence(perception)
        .single(factory.screen(&text.finish, &text.finish_button))
        .flatten())
}
