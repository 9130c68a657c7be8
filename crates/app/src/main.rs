use log::info;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use control::SimulationDriver;
use rim_block_app::export::export_all;
use rim_block_app::runner::{run_realtime, run_simulated, RunSummary};
use rim_block_app::RunConfig;
use simcore::Clock;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::load(&path)?,
        None => RunConfig::default(),
    };

    TermLogger::init(
        config.level_filter()?,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    info!(
        "R={} L={} omega={} noise_std={} at {} Hz for {}s{}",
        config.mechanism.radius,
        config.mechanism.rod_length,
        config.mechanism.omega,
        config.mechanism.noise_std,
        config.tick_hz,
        config.duration_s,
        if config.realtime { " (realtime)" } else { "" }
    );

    if config.realtime {
        let (driver, summary) = run_realtime(&config)?;
        finish(&driver, &summary, &config)
    } else {
        let (driver, summary) = run_simulated(&config)?;
        finish(&driver, &summary, &config)
    }
}

fn finish<C: Clock>(
    driver: &SimulationDriver<C>,
    summary: &RunSummary,
    config: &RunConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "{} ticks, t={:.3}s, {} without derivatives, alpha={:.4}, L_current={:.4}",
        summary.ticks,
        summary.sim_time,
        summary.degenerate_ticks,
        driver.alpha(),
        driver.rod_length_current()
    );
    export_all(driver.sampler().history(), &config.output_dir)?;
    Ok(())
}
