//! Shared simulation vocabulary for the rim-and-block workspace
//!
//! This crate provides:
//! - Simulation context and model traits
//! - Plot data points
//! - Time sources (wall clock and manually driven clock)
//! - Gaussian noise sources
//! - Configuration errors

pub mod clock;
pub mod error;
pub mod noise;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, Result};
pub use noise::{GaussianNoise, NoiseSource};
pub use traits::*;
