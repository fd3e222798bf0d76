use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// JSON body of a save request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    pub filename: String,
    pub filedata: String,
}

/// One delivery attempt to the save endpoint.
///
/// Production code uses `HttpTransport`; unit tests script a mock.
pub trait Transport: Send + Sync {
    /// Succeeds only when the endpoint acknowledged the write.
    fn post(
        &self,
        payload: &SavePayload,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(url, Duration::from_secs(10))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl Transport for HttpTransport {
    async fn post(&self, payload: &SavePayload) -> Result<(), TransportError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(TransportError::Status(status.as_u16())),
        }
    }
}
