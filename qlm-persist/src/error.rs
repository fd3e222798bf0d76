use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("endpoint answered {0} instead of 200")]
    Status(u16),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("too many retries: {attempts} attempts failed, last error: {last}")]
    TooManyRetries {
        attempts: u32,
        #[source]
        last: TransportError,
    },

    #[error("failed to buffer unsaved data: {0}")]
    Buffer(#[from] std::io::Error),

    #[error("save worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
