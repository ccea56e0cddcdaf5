//! Scripted acceleration of the lead vehicle.

use serde::{Deserialize, Serialize};

/// A span of constant lead acceleration, lasting until `until` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// The end time of the phase in s (exclusive).
    pub until: f64,
    /// The acceleration during the phase in m/s^2.
    pub acceleration: f64,
}

/// A piecewise-constant acceleration profile for the lead vehicle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadProfile {
    /// The phases, ordered by `until`.
    pub phases: Vec<Phase>,
    /// The acceleration once every phase has ended, in m/s^2.
    pub final_acceleration: f64,
}

impl Default for LeadProfile {
    fn default() -> Self {
        Self::reference()
    }
}

impl LeadProfile {
    /// A profile with the same acceleration at all times.
    pub fn constant(acceleration: f64) -> Self {
        Self {
            phases: vec![],
            final_acceleration: acceleration,
        }
    }

    /// Cruise for 10 s, slow down at 1 m/s^2 for 10 s, hold for 10 s,
    /// speed up at 1 m/s^2 for 10 s, then hold.
    pub fn reference() -> Self {
        let phase = |until, acceleration| Phase {
            until,
            acceleration,
        };
        Self {
            phases: vec![
                phase(10.0, 0.0),
                phase(20.0, -1.0),
                phase(30.0, 0.0),
                phase(40.0, 1.0),
            ],
            final_acceleration: 0.0,
        }
    }

    /// The lead acceleration at time `t`, in m/s^2.
    pub fn acceleration_at(&self, t: f64) -> f64 {
        self.phases
            .iter()
            .find(|phase| t < phase.until)
            .map(|phase| phase.acceleration)
            .unwrap_or(self.final_acceleration)
    }
}
