//! Kinematics sampler
//!
//! Every tick the sampler solves the geometry at three look-ahead angles,
//! α + ωΔt, α + 2ωΔt and α + 3ωΔt, all taken from the angle stored before
//! the tick. The first solve is the reported position; the other two only
//! feed the forward differences:
//!
//! v = (x₁ − x₀) / Δt
//! a = (x₂ − 2x₁ + x₀) / Δt²
//!
//! The stored angle then advances once by ωΔt.

use log::{debug, trace, warn};
use simcore::{DataPoint, GaussianNoise, Model, NoiseSource, Result, SimContext};

use crate::geometry::LinkagePose;
use crate::history::{HistoryBuffers, Series, MAX_POINTS};
use crate::mechanism::{MechanismConfig, MechanismState};

/// Per-tick scratch and results
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleState {
    /// Elapsed simulation time
    pub t: f64,
    /// Timestep of the latest tick
    pub dt: f64,
    pub x_current: f64,
    pub x_next: f64,
    pub x_next_next: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

/// Everything one tick produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSample {
    pub t: f64,
    pub dt: f64,
    /// Rim angle after the tick's advance
    pub alpha: f64,
    /// (t, x)
    pub position: DataPoint,
    /// (t, v)
    pub velocity: DataPoint,
    /// (t, a)
    pub acceleration: DataPoint,
    /// (x, v)
    pub phase: DataPoint,
    /// Pose at the reported position
    pub pose: LinkagePose,
    /// Set when Δt was not a positive finite number and derivatives were zeroed
    pub degenerate_timestep: bool,
}

impl TickSample {
    pub fn point(&self, series: Series) -> DataPoint {
        match series {
            Series::Position => self.position,
            Series::Velocity => self.velocity,
            Series::Acceleration => self.acceleration,
            Series::Phase => self.phase,
        }
    }
}

pub struct KinematicsSampler {
    mechanism: MechanismState,
    sample: SampleState,
    history: HistoryBuffers,
    pose: LinkagePose,
    rod_length_current: f64,
    noise: Box<dyn NoiseSource>,
}

impl KinematicsSampler {
    pub fn new(config: &MechanismConfig, noise: Box<dyn NoiseSource>) -> Result<Self> {
        Self::with_capacity(config, noise, MAX_POINTS)
    }

    /// Sampler with a [`GaussianNoise`] generator; `None` seeds from entropy.
    pub fn with_seed(config: &MechanismConfig, seed: Option<u64>) -> Result<Self> {
        Self::new(config, Box::new(GaussianNoise::new(seed)))
    }

    pub fn with_capacity(
        config: &MechanismConfig,
        noise: Box<dyn NoiseSource>,
        capacity: usize,
    ) -> Result<Self> {
        let mechanism = MechanismState::from_config(config)?;
        let geometry = mechanism.geometry();
        let mut sampler = KinematicsSampler {
            sample: SampleState::default(),
            history: HistoryBuffers::new(capacity),
            pose: geometry.rest_pose(),
            rod_length_current: mechanism.rod_length(),
            mechanism,
            noise,
        };
        sampler.rest();
        Ok(sampler)
    }

    /// Advance by `dt` and record one point in each history.
    ///
    /// A `dt` that is zero, negative or non-finite does not move time or the
    /// rim; the position is still sampled but velocity and acceleration are
    /// reported as 0.
    pub fn tick(&mut self, dt: f64) -> TickSample {
        let degenerate_timestep = !(dt.is_finite() && dt > 0.0);
        let step = if degenerate_timestep { 0.0 } else { dt };
        if degenerate_timestep {
            debug!("degenerate timestep {dt}; derivatives suppressed for this tick");
        }

        self.sample.t += step;
        self.sample.dt = step;

        let geometry = self.mechanism.geometry();
        let noise_std = self.mechanism.noise_std();
        let alpha = self.mechanism.alpha();
        let rotation = self.mechanism.omega() * step;

        let current = geometry.solve(alpha + rotation, noise_std, self.noise.as_mut());
        let next = geometry.solve(alpha + 2.0 * rotation, noise_std, self.noise.as_mut());
        let next_next = geometry.solve(alpha + 3.0 * rotation, noise_std, self.noise.as_mut());

        self.mechanism.advance(step);

        let x0 = current.block_x();
        let x1 = next.block_x();
        let x2 = next_next.block_x();

        let (velocity, acceleration) = if degenerate_timestep {
            (0.0, 0.0)
        } else {
            (
                finite_or_zero("velocity", (x1 - x0) / step),
                finite_or_zero("acceleration", (x2 - 2.0 * x1 + x0) / (step * step)),
            )
        };

        self.sample.x_current = x0;
        self.sample.x_next = x1;
        self.sample.x_next_next = x2;
        self.sample.velocity = velocity;
        self.sample.acceleration = acceleration;
        self.pose = current;
        self.rod_length_current = next_next.rod_length;

        let t = self.sample.t;
        let tick = TickSample {
            t,
            dt: step,
            alpha: self.mechanism.alpha(),
            position: DataPoint::new(t, x0),
            velocity: DataPoint::new(t, velocity),
            acceleration: DataPoint::new(t, acceleration),
            phase: DataPoint::new(x0, velocity),
            pose: current,
            degenerate_timestep,
        };

        if !self
            .history
            .push_all(tick.position, tick.velocity, tick.acceleration, tick.phase)
        {
            warn!("non-finite sample at t={t} dropped from history");
        }

        trace!("t={t:.4} alpha={:.4} x={x0:.4} v={velocity:.4} a={acceleration:.4}", tick.alpha);
        tick
    }

    /// Change R, L, ω and ε₀. The current pose is left alone; call
    /// [`KinematicsSampler::rest`] to redraw the idle mechanism.
    pub fn configure(
        &mut self,
        radius: f64,
        rod_length: f64,
        omega: f64,
        noise_std: f64,
    ) -> Result<()> {
        self.mechanism.configure(radius, rod_length, omega, noise_std)
    }

    pub fn apply(&mut self, config: &MechanismConfig) -> Result<()> {
        self.mechanism.apply(config)
    }

    /// Put the block at the rest offset for the current R and L.
    pub fn rest(&mut self) {
        let geometry = self.mechanism.geometry();
        self.pose = geometry.rest_pose();
        self.sample.x_current = geometry.rest_offset();
        self.rod_length_current = self.mechanism.rod_length();
    }

    pub fn mechanism(&self) -> &MechanismState {
        &self.mechanism
    }

    pub fn sample(&self) -> &SampleState {
        &self.sample
    }

    pub fn context(&self) -> SimContext {
        SimContext {
            dt: self.sample.dt,
            t: self.sample.t,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.mechanism.alpha()
    }

    /// Rod length of the most recent solve, including noise
    pub fn rod_length_current(&self) -> f64 {
        self.rod_length_current
    }

    pub fn pose(&self) -> &LinkagePose {
        &self.pose
    }

    pub fn x_current(&self) -> f64 {
        self.sample.x_current
    }

    pub fn history(&self) -> &HistoryBuffers {
        &self.history
    }

    /// Snapshot of one series as (x, y) pairs, oldest first
    pub fn series(&self, series: Series) -> Vec<(f64, f64)> {
        self.history.series(series).to_pairs()
    }
}

impl Model for KinematicsSampler {
    fn reset(&mut self) {
        self.sample = SampleState::default();
        self.history.clear();
        self.mechanism.reset_angle();
        self.rest();
    }
}

fn finite_or_zero(name: &str, value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!("non-finite {name} {value} replaced with 0");
        0.0
    }
}
