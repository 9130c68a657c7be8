//! Mechanism parameters
//!
//! [`MechanismConfig`] is the serializable input a host edits;
//! [`MechanismState`] is the validated live state, including the rim angle.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use simcore::{ConfigError, Result};
use std::f64::consts::FRAC_PI_2;

use crate::geometry::{wrap_angle, RimBlockGeometry};

/// Rim angle at rest and after every reset: contact point at the top of the rim
pub const START_ALPHA: f64 = FRAC_PI_2;

/// Editable mechanism parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismConfig {
    /// Rim radius R (> 0)
    pub radius: f64,
    /// Nominal rod length L, raised to R if shorter
    pub rod_length: f64,
    /// Angular velocity ω (rad/s)
    pub omega: f64,
    /// Standard deviation ε₀ of the rod length noise (0 disables noise)
    pub noise_std: f64,
    /// Rim angle at rest (rad)
    pub start_alpha: f64,
}

impl Default for MechanismConfig {
    fn default() -> Self {
        MechanismConfig {
            radius: 80.0,
            rod_length: 300.0,
            omega: 2.0,
            noise_std: 0.05,
            start_alpha: START_ALPHA,
        }
    }
}

impl MechanismConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_rod_length(mut self, rod_length: f64) -> Self {
        self.rod_length = rod_length;
        self
    }

    pub fn with_omega(mut self, omega: f64) -> Self {
        self.omega = omega;
        self
    }

    pub fn with_noise_std(mut self, noise_std: f64) -> Self {
        self.noise_std = noise_std;
        self
    }

    pub fn with_start_alpha(mut self, start_alpha: f64) -> Self {
        self.start_alpha = start_alpha;
        self
    }

    /// Check everything that cannot be fixed by clamping.
    ///
    /// A rod shorter than the radius and a negative noise spread are accepted
    /// here; they are raised to the radius and to 0 when applied.
    pub fn validate(&self) -> Result<()> {
        validate_parameters(self.radius, self.rod_length, self.omega, self.noise_std)?;
        ConfigError::check_finite("start_alpha", self.start_alpha)?;
        Ok(())
    }
}

fn validate_parameters(
    radius: f64,
    rod_length: f64,
    omega: f64,
    noise_std: f64,
) -> Result<()> {
    ConfigError::check_finite("radius", radius)?;
    ConfigError::check_finite("rod_length", rod_length)?;
    ConfigError::check_finite("omega", omega)?;
    ConfigError::check_finite("noise_std", noise_std)?;
    if radius <= 0.0 {
        return Err(ConfigError::NonPositiveRadius(radius));
    }
    Ok(())
}

/// Live mechanism state
///
/// Invariant: `rod_length >= radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct MechanismState {
    radius: f64,
    rod_length: f64,
    alpha: f64,
    omega: f64,
    noise_std: f64,
    start_alpha: f64,
}

impl MechanismState {
    pub fn from_config(config: &MechanismConfig) -> Result<Self> {
        config.validate()?;
        let mut state = MechanismState {
            radius: config.radius,
            rod_length: config.rod_length,
            alpha: config.start_alpha,
            omega: config.omega,
            noise_std: config.noise_std,
            start_alpha: config.start_alpha,
        };
        state.enforce_rod_length();
        state.enforce_noise_std();
        Ok(state)
    }

    /// Apply new parameters. On error nothing is changed.
    pub fn configure(
        &mut self,
        radius: f64,
        rod_length: f64,
        omega: f64,
        noise_std: f64,
    ) -> Result<()> {
        validate_parameters(radius, rod_length, omega, noise_std)?;
        self.radius = radius;
        self.rod_length = rod_length;
        self.omega = omega;
        self.noise_std = noise_std;
        self.enforce_rod_length();
        self.enforce_noise_std();
        debug!(
            "mechanism configured: R={} L={} omega={} noise_std={}",
            self.radius, self.rod_length, self.omega, self.noise_std
        );
        Ok(())
    }

    /// Apply a full config, including the rest angle
    pub fn apply(&mut self, config: &MechanismConfig) -> Result<()> {
        ConfigError::check_finite("start_alpha", config.start_alpha)?;
        self.configure(config.radius, config.rod_length, config.omega, config.noise_std)?;
        self.start_alpha = config.start_alpha;
        Ok(())
    }

    fn enforce_rod_length(&mut self) {
        if self.rod_length < self.radius {
            warn!(
                "rod length {} is shorter than rim radius {}; raising it to the radius",
                self.rod_length, self.radius
            );
            self.rod_length = self.radius;
        }
    }

    fn enforce_noise_std(&mut self) {
        if self.noise_std < 0.0 {
            warn!("noise std-dev {} is negative; noise disabled", self.noise_std);
            self.noise_std = 0.0;
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn rod_length(&self) -> f64 {
        self.rod_length
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn noise_std(&self) -> f64 {
        self.noise_std
    }

    pub fn start_alpha(&self) -> f64 {
        self.start_alpha
    }

    pub fn geometry(&self) -> RimBlockGeometry {
        RimBlockGeometry::new(self.radius, self.rod_length)
    }

    /// sqrt(L² − R²)
    pub fn rest_offset(&self) -> f64 {
        self.geometry().rest_offset()
    }

    /// Rotate the rim by ω·dt.
    pub fn advance(&mut self, dt: f64) {
        self.alpha = wrap_angle(self.alpha + self.omega * dt);
    }

    pub fn reset_angle(&mut self) {
        self.alpha = self.start_alpha;
    }

    pub fn config(&self) -> MechanismConfig {
        MechanismConfig {
            radius: self.radius,
            rod_length: self.rod_length,
            omega: self.omega,
            noise_std: self.noise_std,
            start_alpha: self.start_alpha,
        }
    }
}
