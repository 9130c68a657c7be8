use std::f64::consts::FRAC_PI_2;
use std::sync::{Arc, Mutex};

use approx::assert_abs_diff_eq;
use control::{RunState, SimulationDriver};
use mechanics::{KinematicsSampler, MechanismConfig, Series, MAX_POINTS};
use simcore::ManualClock;

const TICK: f64 = 0.01;

fn build(config: MechanismConfig) -> (SimulationDriver<ManualClock>, ManualClock) {
    let sampler = KinematicsSampler::with_seed(&config, Some(42)).unwrap();
    let clock = ManualClock::new();
    (SimulationDriver::new(sampler, clock.clone()), clock)
}

fn run_ticks(driver: &mut SimulationDriver<ManualClock>, clock: &ManualClock, n: usize) {
    for _ in 0..n {
        clock.advance_secs(TICK);
        driver.tick();
    }
}

fn rest_offset(radius: f64, rod_length: f64) -> f64 {
    (rod_length * rod_length - radius * radius).sqrt()
}

#[test]
fn first_tick_matches_closed_form() {
    let config = MechanismConfig::new()
        .with_radius(80.0)
        .with_rod_length(300.0)
        .with_omega(2.0)
        .with_noise_std(0.0)
        .with_start_alpha(FRAC_PI_2);
    let (mut driver, clock) = build(config);

    driver.start();
    clock.advance_secs(TICK);
    let sample = driver.tick().unwrap();

    let angle = FRAC_PI_2 + 0.02;
    let rim_y = 80.0 * angle.sin();
    let expected = (300.0_f64 * 300.0 - rim_y * rim_y).sqrt() + 80.0 * angle.cos();

    assert_abs_diff_eq!(driver.alpha(), FRAC_PI_2 + 0.02, epsilon = 1e-9);
    assert_abs_diff_eq!(sample.position.y, expected, epsilon = 1e-9);
    assert_abs_diff_eq!(sample.dt, TICK, epsilon = 1e-9);
}

#[test]
fn pause_gap_is_excluded_from_simulation_time() {
    let (mut driver, clock) = build(MechanismConfig::default());
    driver.start();
    run_ticks(&mut driver, &clock, 10);
    let before = driver.sampler().context().t;

    driver.pause();
    clock.advance_secs(5.0);
    driver.resume();

    clock.advance_secs(TICK);
    let sample = driver.tick().unwrap();

    assert_abs_diff_eq!(sample.t - before, TICK, epsilon = 1e-9);
    assert_abs_diff_eq!(sample.dt, TICK, epsilon = 1e-9);
    assert_abs_diff_eq!(driver.elapsed(), 0.11, epsilon = 1e-9);
}

#[test]
fn repeated_pauses_accumulate_delay() {
    let (mut driver, clock) = build(MechanismConfig::default());
    driver.start();
    for _ in 0..3 {
        run_ticks(&mut driver, &clock, 5);
        driver.pause();
        clock.advance_secs(1.5);
        driver.resume();
    }
    run_ticks(&mut driver, &clock, 5);
    assert_abs_diff_eq!(driver.sampler().context().t, 0.2, epsilon = 1e-9);
}

#[test]
fn reset_restores_rest_state() {
    let (mut driver, clock) = build(MechanismConfig::default());
    driver.start();
    run_ticks(&mut driver, &clock, 50);
    driver.pause();
    assert!(driver.reset());

    let sampler = driver.sampler();
    assert_eq!(driver.state(), RunState::Idle);
    assert_eq!(sampler.context().t, 0.0);
    assert_eq!(driver.alpha(), FRAC_PI_2);
    for series in Series::ALL {
        assert!(driver.series(series).is_empty());
    }
    assert_abs_diff_eq!(sampler.x_current(), rest_offset(80.0, 300.0), epsilon = 1e-12);

    // Restarting begins a fresh timeline
    driver.start();
    clock.advance_secs(TICK);
    let sample = driver.tick().unwrap();
    assert_abs_diff_eq!(sample.t, TICK, epsilon = 1e-9);
}

#[test]
fn histories_stay_bounded_and_aligned() {
    let (mut driver, clock) = build(MechanismConfig::default());
    driver.start();
    run_ticks(&mut driver, &clock, MAX_POINTS * 2);

    let position = driver.series(Series::Position);
    let velocity = driver.series(Series::Velocity);
    let acceleration = driver.series(Series::Acceleration);
    let phase = driver.series(Series::Phase);

    assert_eq!(position.len(), MAX_POINTS);
    assert_eq!(velocity.len(), MAX_POINTS);
    assert_eq!(acceleration.len(), MAX_POINTS);
    assert_eq!(phase.len(), MAX_POINTS);

    // Oldest first, and the phase series pairs position with velocity
    assert!(position.windows(2).all(|w| w[0].0 < w[1].0));
    for i in 0..MAX_POINTS {
        assert_eq!(phase[i], (position[i].1, velocity[i].1));
        assert!(acceleration[i].1.is_finite());
    }
    assert_abs_diff_eq!(position[0].0, (MAX_POINTS + 1) as f64 * TICK, epsilon = 1e-9);
}

#[test]
fn tick_without_clock_advance_has_no_derivatives() {
    let (mut driver, _clock) = build(MechanismConfig::default().with_noise_std(0.0));
    driver.start();
    let sample = driver.tick().unwrap();
    assert!(sample.degenerate_timestep);
    assert_eq!(sample.velocity.y, 0.0);
    assert_eq!(sample.acceleration.y, 0.0);
}

#[test]
fn short_rod_configured_while_idle() {
    let (mut driver, _clock) = build(MechanismConfig::default());
    driver.configure(120.0, 100.0, 2.0, 0.0).unwrap();

    let mechanism = driver.sampler().mechanism();
    assert_eq!(mechanism.rod_length(), 120.0);
    assert_eq!(mechanism.rest_offset(), 0.0);
    assert_eq!(driver.sampler().x_current(), 0.0);
}

#[test]
fn configuration_while_running_keeps_the_timeline() {
    let (mut driver, clock) = build(MechanismConfig::default().with_noise_std(0.0));
    driver.start();
    run_ticks(&mut driver, &clock, 10);
    let len = driver.sampler().history().len();

    driver.configure(60.0, 200.0, 4.0, 0.0).unwrap();
    assert_eq!(driver.sampler().history().len(), len);

    clock.advance_secs(TICK);
    let sample = driver.tick().unwrap();
    // The reported position is solved at the post-advance angle
    let angle = sample.alpha;
    let rim_y = 60.0 * angle.sin();
    let expected = (200.0_f64 * 200.0 - rim_y * rim_y).sqrt() + 60.0 * angle.cos();
    assert_abs_diff_eq!(sample.position.y, expected, epsilon = 1e-6);
}

#[test]
fn observers_receive_every_sample() {
    let (mut driver, clock) = build(MechanismConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    driver.subscribe(move |sample| sink.lock().unwrap().push(sample.t));

    driver.start();
    run_ticks(&mut driver, &clock, 3);
    driver.pause();
    run_ticks(&mut driver, &clock, 3);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_abs_diff_eq!(seen[2], 0.03, epsilon = 1e-9);
}

#[test]
fn noisy_rod_length_snapshot() {
    let (mut driver, clock) = build(MechanismConfig::default().with_noise_std(0.05));
    assert_eq!(driver.rod_length_current(), 300.0);
    driver.start();
    run_ticks(&mut driver, &clock, 1);
    let current = driver.rod_length_current();
    assert_ne!(current, 300.0);
    assert!((current - 300.0).abs() < 1.0);
}
