//! Headless host for the rim-and-block simulation
//!
//! Loads a run configuration, drives the lifecycle on a fixed tick cadence
//! and exports the four history series.

pub mod config;
pub mod error;
pub mod export;
pub mod runner;

pub use config::RunConfig;
pub use error::AppError;
