pub mod analysis;
pub mod config;
pub mod design;
pub mod error;
pub mod factory;
pub mod normalize;
pub mod random;
pub mod runner;
pub mod sequence;
pub mod simulate;
pub mod trial;

pub use config::ExperimentConfig;
pub use design::build_timeline;
pub use error::{ExperimentError, Result};
pub use factory::TrialFactory;
pub use normalize::{normalize, results_to_csv};
pub use random::Randomizer;
pub use runner::{Participant, Runner, Screen};
pub use sequence::{Segment, Timeline};
pub use simulate::SimulatedParticipant;
pub use trial::{FinishHook, Input, SliderItem, Stage, StartHook, TrialDescriptor};
