use serde::{Deserialize, Serialize};
use std::fmt;

/// Named phase of the experiment, used to tag trial results
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Block {
    Observation,
    Production,
    Perception,
}

impl Block {
    pub fn as_str(&self) -> &'static str {
        match self {
            Block::Observation => "observation",
            Block::Production => "production",
            Block::Perception => "perception",
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
