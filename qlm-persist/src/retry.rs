use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SaveError;
use crate::transport::{SavePayload, Transport};

/// Fixed-delay retry schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts in total, including the first.
    pub max_attempts: u32,
    /// Pause after each failed attempt except the last.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(250),
        }
    }
}

pub struct SaveClient<T: Transport> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> SaveClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_policy(transport, RetryPolicy::default())
    }

    pub fn with_policy(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Appends `data` to the remote file `name`.
    ///
    /// A retried attempt may duplicate data if an earlier attempt was
    /// written but reported as failed.
    pub async fn save(&self, name: &str, data: &str) -> Result<(), SaveError> {
        let payload = SavePayload {
            filename: name.to_string(),
            filedata: data.to_string(),
        };
        let max_attempts = self.policy.max_attempts.max(1);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.transport.post(&payload).await {
                Ok(()) => {
                    debug!(file = name, attempt, bytes = data.len(), "saved");
                    return Ok(());
                }
                Err(err) if attempt >= max_attempts => {
                    return Err(SaveError::TooManyRetries {
                        attempts: attempt,
                        last: err,
                    });
                }
                Err(err) => {
                    warn!(file = name, attempt, max_attempts, error = %err, "save attempt failed, retrying");
                    tokio::time::sleep(self.policy.delay).await;
                }
            }
        }
    }
}
