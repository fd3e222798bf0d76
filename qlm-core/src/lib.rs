pub mod block;
pub mod response;
pub mod sink;
pub mod stimulus;
pub mod trial;

pub use block::Block;
pub use response::Response;
pub use sink::DataSink;
pub use stimulus::{Label, Stimulus};
pub use trial::TrialResult;
