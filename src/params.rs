//! Simulation parameters and parameter file loading.

use crate::error::{ensure_non_negative, ensure_positive, ConfigError, ParamsError};
use crate::scenario::LeadProfile;
use crate::vehicle::VehicleState;
use crate::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use toml::Value;

/// The parameters of a full simulation run. Every field has a default,
/// so a parameter file only needs to name the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// The total simulated time in s.
    pub duration: f64,
    /// The physics integration step in s.
    pub physics_dt: f64,
    /// The nominal controller sampling step in s.
    pub sample_dt: f64,
    /// The bound of the uniform jitter added to each sampling step, in s.
    pub jitter: f64,
    /// Seed for the jitter generator.
    pub seed: u64,
    /// The initial state of the lead vehicle.
    pub lead: VehicleState,
    /// The initial state of the ego vehicle.
    pub ego: VehicleState,
    /// The ego vehicle's controller.
    pub controller: ControllerConfig,
    /// The distance below which the safety monitor records a violation, in m.
    pub monitor_distance: f64,
    /// The lead vehicle's acceleration profile.
    pub profile: LeadProfile,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            duration: 60.0,
            physics_dt: 0.01,
            sample_dt: 0.1,
            jitter: 0.01,
            seed: 0,
            lead: VehicleState {
                position: 50.0,
                velocity: 20.0,
                acceleration: 0.0,
            },
            ego: VehicleState {
                position: 0.0,
                velocity: 20.0,
                acceleration: 0.0,
            },
            controller: ControllerConfig {
                desired_speed: 25.0,
                safe_distance: 15.0,
                time_gap: 1.5,
                delay_steps: 2,
                ..Default::default()
            },
            monitor_distance: 10.0,
            profile: LeadProfile::reference(),
        }
    }
}

impl SimulationParams {
    /// Checks the timing parameters and the controller configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("duration", self.duration)?;
        ensure_positive("physics_dt", self.physics_dt)?;
        ensure_positive("sample_dt", self.sample_dt)?;
        ensure_non_negative("jitter", self.jitter)?;
        ensure_positive("monitor_distance", self.monitor_distance)?;
        if self.sample_dt < self.physics_dt {
            return Err(ConfigError::SampleFasterThanPhysics {
                sample_dt: self.sample_dt,
                physics_dt: self.physics_dt,
            });
        }
        if self.jitter >= self.sample_dt {
            return Err(ConfigError::JitterTooLarge {
                jitter: self.jitter,
                sample_dt: self.sample_dt,
            });
        }
        self.controller.validate()
    }

    /// The number of physics steps needed to cover `duration`.
    pub fn num_steps(&self) -> usize {
        // Absorb the rounding error of e.g. 60.0 / 0.01.
        (self.duration / self.physics_dt + 1e-9).floor() as usize
    }
}

/// Parses and validates parameters from a TOML string.
///
/// The values in the string are laid over [SimulationParams::default], table by
/// table, so a nested table only replaces the keys it names. Arrays are replaced whole.
pub fn from_str(params_str: &str) -> Result<SimulationParams, ParamsError> {
    let overrides: Value = toml::from_str(params_str)?;
    let mut merged = Value::try_from(SimulationParams::default())?;
    overlay(&mut merged, overrides);

    let params: SimulationParams = merged.try_into()?;
    params.validate()?;
    Ok(params)
}

/// Loads and validates a TOML parameter file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<SimulationParams, ParamsError> {
    let params_str = read_to_string(path)?;
    from_str(&params_str)
}

/// Recursively replaces the values in `base` with those in `overrides`.
fn overlay(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Table(base), Value::Table(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, value) => *base = value,
    }
}
