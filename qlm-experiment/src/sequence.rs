use crate::error::{ExperimentError, Result};
use crate::random::Randomizer;
use crate::trial::TrialDescriptor;

/// Repeats `templates[i]` exactly `weights[i]` times, then shuffles the
/// whole multiset.
pub fn build<T: Clone, R: Randomizer>(
    templates: &[T],
    weights: &[usize],
    rng: &mut R,
) -> Result<Vec<T>> {
    if templates.len() != weights.len() {
        return Err(ExperimentError::WeightMismatch {
            templates: templates.len(),
            weights: weights.len(),
        });
    }

    let mut out = Vec::with_capacity(weights.iter().sum());
    for (template, &weight) in templates.iter().zip(weights) {
        out.extend(std::iter::repeat_n(template, weight).cloned());
    }
    rng.shuffle(&mut out);
    Ok(out)
}

/// Same weight for every template.
pub fn repeat_each<T: Clone, R: Randomizer>(templates: &[T], times: usize, rng: &mut R) -> Vec<T> {
    let mut out: Vec<T> = templates
        .iter()
        .flat_map(|t| std::iter::repeat_n(t, times).cloned())
        .collect();
    rng.shuffle(&mut out);
    out
}

pub fn shuffled<T: Clone, R: Randomizer>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    rng.shuffle(&mut out);
    out
}

#[derive(Debug, Clone)]
pub enum Segment {
    Single(TrialDescriptor),
    Sequence(Vec<TrialDescriptor>),
}

/// Ordered list of fixed screens and generated sequences, flattened into
/// one run for the runner.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(mut self, trial: TrialDescriptor) -> Self {
        self.segments.push(Segment::Single(trial));
        self
    }

    pub fn sequence(mut self, trials: Vec<TrialDescriptor>) -> Self {
        self.segments.push(Segment::Sequence(trials));
        self
    }

    /// Number of trials after flattening.
    pub fn len(&self) -> usize {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Single(_) => 1,
                Segment::Sequence(trials) => trials.len(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flatten(self) -> Vec<TrialDescriptor> {
        let mut out = Vec::with_capacity(self.len());
        for segment in self.segments {
            match segment {
                Segment::Single(trial) => out.push(trial),
                Segment::Sequence(trials) => out.extend(trials),
            }
        }
        out
    }
}
