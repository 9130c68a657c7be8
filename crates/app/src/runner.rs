//! Fixed-cadence tick loop
//!
//! The same loop serves both clocks: in simulated runs "waiting" advances a
//! [`ManualClock`], in realtime runs it sleeps the thread.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use control::SimulationDriver;
use mechanics::KinematicsSampler;
use simcore::{Clock, ManualClock, SystemClock};

use crate::config::RunConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: usize,
    /// Final simulation time (s)
    pub sim_time: f64,
    /// Ticks whose derivatives were suppressed
    pub degenerate_ticks: usize,
}

pub fn build_driver<C: Clock>(
    config: &RunConfig,
    clock: C,
) -> Result<SimulationDriver<C>, AppError> {
    config.validate()?;
    let sampler = KinematicsSampler::with_seed(&config.mechanism, config.seed)?;
    Ok(SimulationDriver::new(sampler, clock))
}

/// Run against a simulated clock; finishes immediately.
pub fn run_simulated(
    config: &RunConfig,
) -> Result<(SimulationDriver<ManualClock>, RunSummary), AppError> {
    let clock = ManualClock::new();
    let mut driver = build_driver(config, clock.clone())?;
    let summary = drive(&mut driver, config, |dt| clock.advance(dt));
    Ok((driver, summary))
}

/// Run against the wall clock, sleeping between ticks.
pub fn run_realtime(
    config: &RunConfig,
) -> Result<(SimulationDriver<SystemClock>, RunSummary), AppError> {
    let mut driver = build_driver(config, SystemClock::new())?;
    let summary = drive(&mut driver, config, std::thread::sleep);
    Ok((driver, summary))
}

/// Start the driver, tick `config.total_ticks()` times and leave it paused.
pub fn drive<C, W>(driver: &mut SimulationDriver<C>, config: &RunConfig, mut wait: W) -> RunSummary
where
    C: Clock,
    W: FnMut(Duration),
{
    let interval = config.tick_interval();
    let total = config.total_ticks();
    let pause_tick = config.pause_tick();
    let report_every = (config.tick_hz.round() as usize).max(1);

    let degenerate = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&degenerate);
    driver.subscribe(move |sample| {
        if sample.degenerate_timestep {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    });

    driver.start();
    let mut ticks = 0;
    for i in 0..total {
        if pause_tick == Some(i) {
            driver.pause();
            info!("paused for {:.2}s", config.pause_for_s);
            wait(config.pause_duration());
            driver.resume();
        }

        wait(interval);
        if let Some(sample) = driver.tick() {
            ticks += 1;
            if ticks % report_every == 0 {
                info!(
                    "t={:.2}s x={:.3} v={:.3} a={:.3}",
                    sample.t, sample.position.y, sample.velocity.y, sample.acceleration.y
                );
            }
        }
    }
    driver.pause();

    RunSummary {
        ticks,
        sim_time: driver.sampler().context().t,
        degenerate_ticks: degenerate.load(Ordering::Relaxed),
    }
}
