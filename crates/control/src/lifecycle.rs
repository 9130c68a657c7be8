//! Simulation lifecycle
//!
//! Transitions:
//! - Idle → Running on `start`
//! - Running → Paused on `pause`
//! - Paused → Running on `resume` (or `start`)
//! - Running/Paused → Idle on `reset`
//!
//! Any other request leaves the state unchanged and returns `false`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use mechanics::{KinematicsSampler, MechanismConfig, Series, TickSample};
use simcore::{Clock, Model, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Callback invoked with every tick sample
pub type TickObserver = Box<dyn FnMut(&TickSample) + Send>;

/// Drives a [`KinematicsSampler`] from a [`Clock`]
///
/// Simulation time is wall time since `start`, minus the total time spent
/// paused. Each `tick` feeds the sampler the difference between the current
/// and the previous simulation time.
pub struct SimulationDriver<C: Clock> {
    sampler: KinematicsSampler,
    clock: C,
    state: RunState,
    /// Clock reading at `start`
    start_time: Duration,
    /// Clock reading at the latest `pause`
    pause_time: Duration,
    /// Total paused time since `start`
    time_delay: Duration,
    /// Simulation time of the previous tick (s)
    last_time: f64,
    observers: Vec<TickObserver>,
}

impl<C: Clock> SimulationDriver<C> {
    pub fn new(sampler: KinematicsSampler, clock: C) -> Self {
        Self {
            sampler,
            clock,
            state: RunState::Idle,
            start_time: Duration::ZERO,
            pause_time: Duration::ZERO,
            time_delay: Duration::ZERO,
            last_time: 0.0,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Start from Idle, or resume from Paused.
    pub fn start(&mut self) -> bool {
        match self.state {
            RunState::Idle => {
                self.sampler.reset();
                self.start_time = self.clock.now();
                self.pause_time = self.start_time;
                self.time_delay = Duration::ZERO;
                self.last_time = 0.0;
                self.state = RunState::Running;
                debug!("simulation started");
                true
            }
            RunState::Paused => self.resume(),
            RunState::Running => {
                debug!("start ignored: already running");
                false
            }
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.state != RunState::Running {
            debug!("pause ignored in state {:?}", self.state);
            return false;
        }
        self.pause_time = self.clock.now();
        self.state = RunState::Paused;
        debug!("simulation paused at t={:.3}", self.elapsed());
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != RunState::Paused {
            debug!("resume ignored in state {:?}", self.state);
            return false;
        }
        let paused_for = self.clock.now().saturating_sub(self.pause_time);
        self.time_delay += paused_for;
        self.state = RunState::Running;
        debug!("simulation resumed after {:.3}s paused", paused_for.as_secs_f64());
        true
    }

    pub fn reset(&mut self) -> bool {
        if self.state == RunState::Idle {
            debug!("reset ignored: already idle");
            return false;
        }
        self.state = RunState::Idle;
        self.start_time = Duration::ZERO;
        self.pause_time = Duration::ZERO;
        self.time_delay = Duration::ZERO;
        self.last_time = 0.0;
        self.sampler.reset();
        debug!("simulation reset");
        true
    }

    /// Simulation time in seconds, excluding paused intervals
    pub fn elapsed(&self) -> f64 {
        let now = match self.state {
            RunState::Idle => return 0.0,
            RunState::Running => self.clock.now(),
            RunState::Paused => self.pause_time,
        };
        now.saturating_sub(self.start_time)
            .saturating_sub(self.time_delay)
            .as_secs_f64()
    }

    /// Sample once if running. Returns `None` while Idle or Paused.
    pub fn tick(&mut self) -> Option<TickSample> {
        if self.state != RunState::Running {
            return None;
        }
        let time = self.elapsed();
        let dt = time - self.last_time;
        self.last_time = time;

        let sample = self.sampler.tick(dt);
        for observer in self.observers.iter_mut() {
            observer(&sample);
        }
        Some(sample)
    }

    /// Change R, L, ω and ε₀. While Idle the rest pose is re-derived at once.
    pub fn configure(
        &mut self,
        radius: f64,
        rod_length: f64,
        omega: f64,
        noise_std: f64,
    ) -> Result<()> {
        if let Err(err) = self.sampler.configure(radius, rod_length, omega, noise_std) {
            warn!("configuration rejected: {err}");
            return Err(err);
        }
        self.refresh_rest_pose();
        Ok(())
    }

    pub fn apply(&mut self, config: &MechanismConfig) -> Result<()> {
        if let Err(err) = self.sampler.apply(config) {
            warn!("configuration rejected: {err}");
            return Err(err);
        }
        self.refresh_rest_pose();
        Ok(())
    }

    fn refresh_rest_pose(&mut self) {
        if self.state == RunState::Idle {
            self.sampler.reset();
        }
    }

    /// Register a callback for every future tick sample
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&TickSample) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn sampler(&self) -> &KinematicsSampler {
        &self.sampler
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn alpha(&self) -> f64 {
        self.sampler.alpha()
    }

    pub fn rod_length_current(&self) -> f64 {
        self.sampler.rod_length_current()
    }

    pub fn series(&self, series: Series) -> Vec<(f64, f64)> {
        self.sampler.series(series)
    }
}
