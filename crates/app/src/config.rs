//! Run configuration, loaded from JSON

use log::LevelFilter;
use mechanics::MechanismConfig;
use serde::{Deserialize, Serialize};
use simcore::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub mechanism: MechanismConfig,
    /// Tick cadence (Hz)
    pub tick_hz: f64,
    /// Simulated run length (s), pauses excluded
    pub duration_s: f64,
    /// Noise seed; entropy when absent
    pub seed: Option<u64>,
    /// Sleep between ticks instead of advancing a simulated clock
    pub realtime: bool,
    /// Pause once this much simulation time has elapsed
    pub pause_at_s: Option<f64>,
    /// Length of the scripted pause (s)
    pub pause_for_s: f64,
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mechanism: MechanismConfig::default(),
            tick_hz: 100.0,
            duration_s: 10.0,
            seed: None,
            realtime: false,
            pause_at_s: None,
            pause_for_s: 0.0,
            output_dir: PathBuf::from("output"),
            log_level: "info".to_string(),
        }
    }
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let config: RunConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mechanism.validate()?;
        ConfigError::check_finite("tick_hz", self.tick_hz)?;
        ConfigError::check_finite("duration_s", self.duration_s)?;
        ConfigError::check_finite("pause_for_s", self.pause_for_s)?;
        if self.tick_hz <= 0.0 {
            return Err(ConfigError::NonPositiveTickRate(self.tick_hz));
        }
        ConfigError::check_duration("tick interval", 1.0 / self.tick_hz)?;
        ConfigError::check_duration("pause_for_s", self.pause_for_s.max(0.0))?;
        Ok(())
    }

    /// 1 / tick_hz. Saturates for rates that fail validation.
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.tick_hz).unwrap_or(Duration::MAX)
    }

    pub fn total_ticks(&self) -> usize {
        (self.duration_s.max(0.0) * self.tick_hz).round() as usize
    }

    /// Index of the tick before which the scripted pause happens
    pub fn pause_tick(&self) -> Option<usize> {
        self.pause_at_s
            .filter(|at| at.is_finite() && *at >= 0.0)
            .map(|at| (at * self.tick_hz).round() as usize)
    }

    pub fn pause_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.pause_for_s.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, AppError> {
        self.log_level
            .parse()
            .map_err(|_| AppError::LogLevel(self.log_level.clone()))
    }
}
