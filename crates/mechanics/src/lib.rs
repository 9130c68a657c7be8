pub mod geometry;
pub mod history;
pub mod mechanism;
pub mod sampler;

pub use geometry::{wrap_angle, LinkagePose, RimBlockGeometry};
pub use history::{History, HistoryBuffers, Series, MAX_POINTS};
pub use mechanism::{MechanismConfig, MechanismState, START_ALPHA};
pub use sampler::{KinematicsSampler, SampleState, TickSample};
