//! Run/pause/reset lifecycle for the kinematics sampler
//!
//! This crate provides:
//! - The `RunState` machine (Idle, Running, Paused)
//! - A `SimulationDriver` that derives tick timesteps from a clock,
//!   excluding time spent paused
//! - Observer registration for tick samples

pub mod lifecycle;

pub use lifecycle::*;
