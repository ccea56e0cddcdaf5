pub use self::delay::{DelayBuffer, MeasurementSample};
pub use self::quantization::{quantize, MIN_RESOLUTION};
use crate::error::{ensure_non_negative, ensure_positive, ConfigError};
use crate::util::Interval;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

mod delay;
mod quantization;

/// Proportional gain on the speed error while cruising.
const KP_CRUISE: f64 = 0.5;

/// Proportional gain on the spacing error while following.
const KP_DIST: f64 = 0.2;

/// Proportional gain on the relative velocity while following.
const KP_VEL: f64 = 0.5;

/// Below this fraction of the safe distance the controller brakes at full force.
const EMERGENCY_FRACTION: f64 = 0.8;

/// Following is only released once the gap exceeds the desired gap by this factor.
const FOLLOW_RELEASE_FACTOR: f64 = 1.1;

/// The discrete mode of the hybrid automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscreteMode {
    /// Track the desired speed.
    #[default]
    Cruise,
    /// Track a speed-dependent gap to the lead vehicle.
    Follow,
    /// Brake as hard as allowed.
    EmergencyBrake,
}

impl DiscreteMode {
    pub const ALL: [DiscreteMode; 3] = [Self::Cruise, Self::Follow, Self::EmergencyBrake];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cruise => "CRUISE",
            Self::Follow => "FOLLOW",
            Self::EmergencyBrake => "EMERGENCY_BRAKE",
        }
    }
}

impl fmt::Display for DiscreteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parameters of an ACC controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// The cruising speed in m/s.
    pub desired_speed: f64,
    /// The minimum gap to the lead vehicle in m.
    pub safe_distance: f64,
    /// The desired time headway in s, added on top of `safe_distance`.
    pub time_gap: f64,
    /// The sensor granularity, in m or m/s. At or below 1e-6 there is no quantization.
    pub sensor_resolution: f64,
    /// The maximum acceleration in m/s^2.
    pub max_acceleration: f64,
    /// The maximum braking deceleration in m/s^2, given as a positive magnitude.
    pub max_braking: f64,
    /// The number of controller invocations between a measurement and its use.
    pub delay_steps: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            desired_speed: 30.0,
            safe_distance: 20.0,
            time_gap: 1.5,
            sensor_resolution: 0.1,
            max_acceleration: 2.0,
            max_braking: 5.0,
            delay_steps: 0,
        }
    }
}

impl ControllerConfig {
    /// Checks that every parameter lies in its documented domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("desired_speed", self.desired_speed)?;
        ensure_positive("safe_distance", self.safe_distance)?;
        ensure_non_negative("time_gap", self.time_gap)?;
        ensure_non_negative("sensor_resolution", self.sensor_resolution)?;
        ensure_positive("max_acceleration", self.max_acceleration)?;
        ensure_positive("max_braking", self.max_braking)?;
        Ok(())
    }

    /// The range that continuous commands are saturated to.
    pub fn command_bounds(&self) -> Interval<f64> {
        Interval::new(-self.max_braking, self.max_acceleration)
    }

    /// The gap the controller tries to keep at the given ego velocity, in m.
    pub fn desired_following_distance(&self, ego_velocity: f64) -> f64 {
        self.safe_distance + self.time_gap * ego_velocity
    }
}

/// A hybrid-automaton adaptive cruise controller.
///
/// Each invocation quantizes the measurements, pushes them into a delay buffer
/// and acts on the oldest buffered sample. The discrete mode is updated first,
/// then the mode's control law produces the acceleration command.
#[derive(Clone, Debug)]
pub struct Controller {
    config: ControllerConfig,
    mode: DiscreteMode,
    buffer: DelayBuffer,
}

impl Controller {
    /// Creates a new controller in [DiscreteMode::Cruise].
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            mode: DiscreteMode::Cruise,
            buffer: DelayBuffer::new(config.delay_steps),
        })
    }

    /// The controller's parameters.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The current discrete mode.
    pub fn mode(&self) -> DiscreteMode {
        self.mode
    }

    /// The buffered measurements awaiting use.
    pub fn delay_buffer(&self) -> &DelayBuffer {
        &self.buffer
    }

    /// Quantizes a raw measurement with the configured sensor resolution.
    pub fn quantize(&self, value: f64) -> f64 {
        quantize(value, self.config.sensor_resolution)
    }

    /// Computes the acceleration command for one controller invocation.
    ///
    /// # Parameters
    /// * `ego_velocity` - The ego vehicle's velocity (m/s).
    /// * `lead_velocity` - The lead vehicle's velocity (m/s).
    /// * `distance` - The gap between the vehicles (m).
    pub fn get_control_action(
        &mut self,
        ego_velocity: f64,
        lead_velocity: f64,
        distance: f64,
    ) -> f64 {
        let measured = MeasurementSample {
            ego_velocity: self.quantize(ego_velocity),
            lead_velocity: self.quantize(lead_velocity),
            distance: self.quantize(distance),
        };
        self.buffer.push(measured);
        let delayed = self.buffer.oldest().unwrap_or(measured);

        let mode = next_mode(self.mode, &delayed, &self.config);
        if mode != self.mode {
            debug!(
                "Controller {} -> {} at delayed distance {:.2} m",
                self.mode, mode, delayed.distance
            );
            self.mode = mode;
        }

        let command = control_law(mode, &delayed, &self.config);
        trace!("{:?} in {} -> {:.3} m/s^2", delayed, mode, command);
        command
    }
}

/// Evaluates the mode transition against a (delayed) sample.
/// Emergency braking takes priority, then following, then the hysteresis rules.
pub fn next_mode(
    current: DiscreteMode,
    sample: &MeasurementSample,
    config: &ControllerConfig,
) -> DiscreteMode {
    use DiscreteMode::*;

    let distance = sample.distance;
    let desired = config.desired_following_distance(sample.ego_velocity);

    if distance < config.safe_distance * EMERGENCY_FRACTION {
        return EmergencyBrake;
    }
    if distance < desired {
        return Follow;
    }
    match current {
        Follow if distance > desired * FOLLOW_RELEASE_FACTOR => Cruise,
        Follow => Follow,
        // Leaving emergency braking has no hysteresis band of its own.
        EmergencyBrake if distance > config.safe_distance => {
            if distance > desired {
                Cruise
            } else {
                Follow
            }
        }
        EmergencyBrake => EmergencyBrake,
        Cruise => Cruise,
    }
}

/// Computes the acceleration command of `mode` for a (delayed) sample.
pub fn control_law(
    mode: DiscreteMode,
    sample: &MeasurementSample,
    config: &ControllerConfig,
) -> f64 {
    match mode {
        DiscreteMode::EmergencyBrake => -config.max_braking,
        DiscreteMode::Cruise => {
            let acc = KP_CRUISE * (config.desired_speed - sample.ego_velocity);
            config.command_bounds().clamp(acc)
        }
        DiscreteMode::Follow => {
            let desired = config.desired_following_distance(sample.ego_velocity);
            let dist_error = sample.distance - desired;
            let vel_error = sample.lead_velocity - sample.ego_velocity;
            let acc = KP_DIST * dist_error + KP_VEL * vel_error;
            config.command_bounds().clamp(acc)
        }
    }
}
