use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw participant response to one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Response {
    /// The stage ended on its duration without input.
    Timeout,
    /// Index of the clicked button, in displayed order.
    Button(usize),
    /// Position of a single slider, 0..=100.
    Slider(u8),
    /// Positions of every slider on a panel, in panel order.
    Sliders(Vec<u8>),
}

impl Response {
    pub fn button(&self) -> Option<usize> {
        match self {
            Response::Button(index) => Some(*index),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Response::Timeout)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Timeout => Ok(()),
            Response::Button(index) => write!(f, "{index}"),
            Response::Slider(value) => write!(f, "{value}"),
            Response::Sliders(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}
