use crate::error::{ensure_positive, ConfigError};
use log::warn;
use serde::{Deserialize, Serialize};

/// A recorded breach of the minimum safe distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafetyViolation {
    /// The simulation time of the breach in s.
    pub time: f64,
    /// The inter-vehicle distance at that time in m.
    pub distance: f64,
}

/// Observes the gap between two vehicles and records every breach of a
/// fixed minimum distance. It never intervenes in the control loop.
#[derive(Clone, Debug)]
pub struct SafetyMonitor {
    safe_distance: f64,
    violations: Vec<SafetyViolation>,
    /// Whether the previous check was unsafe, used to log once per episode.
    in_violation: bool,
}

impl SafetyMonitor {
    /// Creates a monitor with the given minimum safe distance in m.
    pub fn new(safe_distance: f64) -> Result<Self, ConfigError> {
        ensure_positive("safe_distance", safe_distance)?;
        Ok(Self {
            safe_distance,
            violations: vec![],
            in_violation: false,
        })
    }

    /// The minimum safe distance in m.
    pub fn safe_distance(&self) -> f64 {
        self.safe_distance
    }

    /// Every violation recorded so far, oldest first.
    pub fn violations(&self) -> &[SafetyViolation] {
        &self.violations
    }

    /// Checks the distance at `time`, returning `true` if it is safe.
    /// Unsafe distances are appended to the violation log.
    pub fn check(&mut self, distance: f64, time: f64) -> bool {
        let safe = distance >= self.safe_distance;
        if !safe {
            if !self.in_violation {
                warn!(
                    "Safety violation at t = {:.2} s: distance {:.2} m < {:.2} m",
                    time, distance, self.safe_distance
                );
            }
            self.violations.push(SafetyViolation { time, distance });
        }
        self.in_violation = !safe;
        safe
    }
}
