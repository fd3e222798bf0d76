//! Delivery of normalized result lines to the save endpoint.
//!
//! `SaveClient` performs one save with bounded retries. `SaveQueue` runs a
//! client on a background task so the participant-facing runner never
//! waits on the network; lines that exhaust their retries go to a
//! `LocalBuffer` instead of being dropped.

pub mod error;
pub mod queue;
pub mod retry;
pub mod transport;

pub use error::{SaveError, TransportError};
pub use queue::{LocalBuffer, SaveHandle, SaveJob, SaveQueue, SaveReport};
pub use retry::{RetryPolicy, SaveClient};
pub use transport::{HttpTransport, SavePayload, Transport};
