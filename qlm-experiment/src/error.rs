use qlm_core::Response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("{weights} weights given for {templates} templates")]
    WeightMismatch { templates: usize, weights: usize },

    /// A confirmation stage ran without a selection on the stage before it.
    #[error("stage {trial_index} needs the previous stage's selected label, but none was recorded")]
    MissingSelection { trial_index: usize },

    #[error("response {response:?} does not fit stage {trial_index}")]
    InvalidResponse {
        trial_index: usize,
        response: Response,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExperimentError>;
