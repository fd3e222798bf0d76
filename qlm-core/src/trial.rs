use serde::{Deserialize, Serialize};

use crate::{Block, Label, Response};

/// Recorded result per stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub block: Option<Block>,
    /// Position of the stage in the whole run, counting every stage.
    pub trial_index: usize,
    /// Milliseconds since the session started, taken when the stage ended.
    pub time_elapsed_ms: u64,
    pub stimulus: String,
    /// Options in the order they were displayed.
    pub choices: Vec<Label>,
    pub label_selected: Option<Label>,
    pub response: Response,
    pub rt_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slider_values: Vec<u8>,
}

impl TrialResult {
    pub fn selected_button(&self) -> Option<usize> {
        self.response.button()
    }

    /// Sets `label_selected` from the button response, indexing the
    /// displayed option order.
    pub fn resolve_selection(&mut self) -> Option<&Label> {
        self.label_selected = self
            .selected_button()
            .and_then(|index| self.choices.get(index).cloned());
        self.label_selected.as_ref()
    }
}
