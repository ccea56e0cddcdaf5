use crate::controller::{Controller, DiscreteMode};
use crate::error::ConfigError;
use crate::params::SimulationParams;
use crate::safety::{SafetyMonitor, SafetyViolation};
use crate::sampler::SampleClock;
use crate::vehicle::Vehicle;
use itertools::{Itertools, MinMaxResult};
use log::info;
use serde::{Deserialize, Serialize};

/// A two-vehicle ACC simulation.
///
/// Physics runs at a fixed step while the controller runs on its own jittered
/// clock, holding its last command between samples. Each step is performed in
/// the order: controller sample (when due), lead then ego integration, safety check.
pub struct Simulation {
    params: SimulationParams,
    /// The scripted vehicle ahead.
    lead: Vehicle,
    /// The controlled vehicle.
    ego: Vehicle,
    controller: Controller,
    monitor: SafetyMonitor,
    clock: SampleClock,
    /// The command held since the last controller sample, in m/s^2.
    command: f64,
    /// The number of physics steps performed.
    frame: usize,
    history: History,
}

/// The time series recorded during a run, one entry per physics step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// The physics step in s.
    pub dt: f64,
    pub time: Vec<f64>,
    pub ego_position: Vec<f64>,
    pub ego_velocity: Vec<f64>,
    pub ego_acceleration: Vec<f64>,
    pub lead_position: Vec<f64>,
    pub lead_velocity: Vec<f64>,
    pub distance: Vec<f64>,
    pub mode: Vec<DiscreteMode>,
    pub violations: Vec<SafetyViolation>,
}

/// Aggregate figures of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// The number of physics steps recorded.
    pub steps: usize,
    /// The number of safety violations.
    pub violations: usize,
    /// The smallest distance between the vehicles, in m.
    pub min_distance: f64,
    /// The largest distance between the vehicles, in m.
    pub max_distance: f64,
    /// The number of times the controller changed mode.
    pub mode_transitions: usize,
    /// The time spent in each mode, in s.
    pub time_in_mode: Vec<(DiscreteMode, f64)>,
}

impl Simulation {
    /// Creates a new simulation from the given parameters.
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let controller = Controller::new(params.controller)?;
        let monitor = SafetyMonitor::new(params.monitor_distance)?;
        let clock = SampleClock::new(params.sample_dt, params.jitter, params.seed);
        Ok(Self {
            lead: params.lead.into(),
            ego: params.ego.into(),
            controller,
            monitor,
            clock,
            command: 0.0,
            frame: 0,
            history: History {
                dt: params.physics_dt,
                ..Default::default()
            },
            params,
        })
    }

    /// The parameters of the simulation.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// The current simulation time in s.
    pub fn time(&self) -> f64 {
        self.frame as f64 * self.params.physics_dt
    }

    /// The number of physics steps performed so far.
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn lead(&self) -> &Vehicle {
        &self.lead
    }

    pub fn ego(&self) -> &Vehicle {
        &self.ego
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn monitor(&self) -> &SafetyMonitor {
        &self.monitor
    }

    /// The acceleration command currently held, in m/s^2.
    pub fn command(&self) -> f64 {
        self.command
    }

    /// The gap between the lead and ego vehicles, in m.
    pub fn distance(&self) -> f64 {
        self.lead.position() - self.ego.position()
    }

    /// The history recorded so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Advances the simulation by one physics step, returning whether
    /// the distance after the step is safe.
    pub fn step(&mut self) -> bool {
        let dt = self.params.physics_dt;
        let t = self.time();
        let lead_acc = self.params.profile.acceleration_at(t);

        if self.clock.is_due(t) {
            self.command = self.controller.get_control_action(
                self.ego.velocity(),
                self.lead.velocity(),
                self.distance(),
            );
            self.clock.advance();
        }

        self.lead.update(dt, lead_acc);
        self.ego.update(dt, self.command);

        let now = t + dt;
        let distance = self.distance();
        let safe = self.monitor.check(distance, now);

        self.record(now, distance, safe);
        self.frame += 1;
        safe
    }

    /// Runs every remaining step and returns the recorded history.
    pub fn run(mut self) -> History {
        let steps = self.params.num_steps();
        info!(
            "Simulating {} steps of {} s, controller every {} s (+/- {} s)",
            steps, self.params.physics_dt, self.params.sample_dt, self.params.jitter
        );
        while self.frame < steps {
            self.step();
        }

        let summary = self.history.summary();
        info!(
            "Simulation completed: {} steps, {} safety violations, min distance {:.2} m",
            summary.steps, summary.violations, summary.min_distance
        );
        self.history
    }

    fn record(&mut self, time: f64, distance: f64, safe: bool) {
        let h = &mut self.history;
        h.time.push(time);
        h.ego_position.push(self.ego.position());
        h.ego_velocity.push(self.ego.velocity());
        h.ego_acceleration.push(self.ego.acceleration());
        h.lead_position.push(self.lead.position());
        h.lead_velocity.push(self.lead.velocity());
        h.distance.push(distance);
        h.mode.push(self.controller.mode());
        if !safe {
            h.violations.push(SafetyViolation { time, distance });
        }
    }
}

impl History {
    /// The number of recorded steps.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Whether the controller was ever in `mode`.
    pub fn visited(&self, mode: DiscreteMode) -> bool {
        self.mode.contains(&mode)
    }

    /// Serializes the history as JSON for downstream plotting.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Computes aggregate figures of the run.
    pub fn summary(&self) -> Summary {
        let (min_distance, max_distance) =
            match self.distance.iter().copied().minmax_by(f64::total_cmp) {
                MinMaxResult::NoElements => (f64::NAN, f64::NAN),
                MinMaxResult::OneElement(d) => (d, d),
                MinMaxResult::MinMax(min, max) => (min, max),
            };

        let mode_transitions = self
            .mode
            .iter()
            .tuple_windows()
            .filter(|(a, b)| a != b)
            .count();

        let counts = self.mode.iter().counts();
        let time_in_mode = DiscreteMode::ALL
            .iter()
            .map(|mode| {
                let steps = counts.get(mode).copied().unwrap_or(0);
                (*mode, steps as f64 * self.dt)
            })
            .collect();

        Summary {
            steps: self.len(),
            violations: self.violations.len(),
            min_distance,
            max_distance,
            mode_transitions,
            time_in_mode,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scenario::LeadProfile;
    use crate::vehicle::VehicleState;
    use assert_approx_eq::assert_approx_eq;

    fn still_params() -> SimulationParams {
        SimulationParams {
            duration: 1.0,
            jitter: 0.0,
            lead: VehicleState {
                position: 100.0,
                ..Default::default()
            },
            ego: VehicleState::default(),
            profile: LeadProfile::constant(0.0),
            ..Default::default()
        }
    }

    #[test]
    fn samples_on_the_first_step() {
        let mut sim = Simulation::new(still_params()).unwrap();
        assert_eq!(sim.command(), 0.0);
        sim.step();
        // Cruising from rest: 0.5 * 25 saturates at the maximum acceleration.
        assert_eq!(sim.command(), 2.0);
        assert_eq!(sim.ego().acceleration(), 2.0);
        assert_eq!(sim.ego().position(), 0.0);
        assert_approx_eq!(sim.ego().velocity(), 0.02);
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn holds_command_between_samples() {
        let mut sim = Simulation::new(still_params()).unwrap();
        // Only the t = 0 sample falls within these steps.
        for _ in 0..10 {
            sim.step();
        }
        assert_eq!(sim.command(), 2.0);
        let history = sim.history();
        assert!(history.ego_acceleration.iter().all(|a| *a == 2.0));
        assert_eq!(history.len(), 10);
        assert_approx_eq!(history.time[0], 0.01);
        assert_approx_eq!(history.time[9], 0.1);
    }

    #[test]
    fn run_covers_duration() {
        let history = Simulation::new(still_params()).unwrap().run();
        assert_eq!(history.len(), 100);
        assert_eq!(history.dt, 0.01);
        assert!(history.violations.is_empty());
        assert!(history.visited(DiscreteMode::Cruise));

        let summary = history.summary();
        assert_eq!(summary.steps, 100);
        assert_eq!(summary.mode_transitions, 0);
        assert_approx_eq!(summary.time_in_mode[0].1, 1.0);
        assert!(summary.max_distance <= 100.0);
        assert!(summary.min_distance < summary.max_distance);
    }

    #[test]
    fn rejects_invalid_params() {
        let params = SimulationParams {
            physics_dt: -0.01,
            ..Default::default()
        };
        assert!(Simulation::new(params).is_err());
    }

    #[test]
    fn empty_summary() {
        let summary = History::default().summary();
        assert_eq!(summary.steps, 0);
        assert!(summary.min_distance.is_nan());
    }

    #[test]
    fn history_json_shape() {
        let mut sim = Simulation::new(still_params()).unwrap();
        sim.step();
        let json: serde_json::Value =
            serde_json::from_str(&sim.history().to_json().unwrap()).unwrap();
        assert_eq!(json["mode"][0], "CRUISE");
        assert_eq!(json["time"].as_array().unwrap().len(), 1);
        assert!(json["violations"].as_array().unwrap().is_empty());
    }
}
