use std::collections::BTreeMap;

use qlm_core::{Block, Label, TrialResult};
use serde::Serialize;

/// Production choices for one object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectSummary {
    pub label_counts: BTreeMap<Label, usize>,
    pub responses: usize,
    pub mean_rt_ms: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub stages: usize,
    pub observations: usize,
    /// Keyed by stimulus id.
    pub production: BTreeMap<String, ObjectSummary>,
    pub slider_values: Vec<u8>,
}

impl ObjectSummary {
    /// Share of responses that chose `label`.
    pub fn proportion(&self, label: &str) -> f64 {
        if self.responses == 0 {
            return 0.0;
        }
        self.label_counts.get(label).copied().unwrap_or(0) as f64 / self.responses as f64
    }
}

pub fn summarize(results: &[TrialResult]) -> Summary {
    let mut summary = Summary {
        stages: results.len(),
        ..Summary::default()
    };
    let mut rt_totals: BTreeMap<String, (u64, usize)> = BTreeMap::new();

    for result in results {
        match result.block {
            Some(Block::Observation) => summary.observations += 1,
            Some(Block::Production) => {
                let Some(label) = &result.label_selected else {
                    continue;
                };
                let object = summary
                    .production
                    .entry(result.stimulus.clone())
                    .or_default();
                *object.label_counts.entry(label.clone()).or_insert(0) += 1;
                object.responses += 1;

                if let Some(rt) = result.rt_ms {
                    let total = rt_totals.entry(result.stimulus.clone()).or_default();
                    total.0 += rt;
                    total.1 += 1;
                }
            }
            Some(Block::Perception) => {
                summary
                    .slider_values
                    .extend_from_slice(&result.slider_values);
            }
            None => {}
        }
    }

    for (stimulus, (total, n)) in rt_totals {
        if let Some(object) = summary.production.get_mut(&stimulus) {
            object.mean_rt_ms = Some(total as f64 / n as f64);
        }
    }

    summary
}
