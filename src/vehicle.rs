use serde::{Deserialize, Serialize};

/// The kinematic state of a point-mass vehicle on a 1-D track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleState {
    /// The longitudinal position in m.
    pub position: f64,
    /// The velocity in m/s.
    pub velocity: f64,
    /// The last applied acceleration in m/s^2.
    pub acceleration: f64,
}

/// A simulated vehicle.
#[derive(Clone, Debug, Default)]
pub struct Vehicle {
    state: VehicleState,
}

impl Vehicle {
    /// Creates a new vehicle with the given initial conditions.
    pub fn new(position: f64, velocity: f64, acceleration: f64) -> Self {
        Self {
            state: VehicleState {
                position,
                velocity,
                acceleration,
            },
        }
    }

    /// The longitudinal position of the vehicle in m.
    pub fn position(&self) -> f64 {
        self.state.position
    }

    /// The vehicle's velocity in m/s.
    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    /// The acceleration applied during the most recent update, in m/s^2.
    pub fn acceleration(&self) -> f64 {
        self.state.acceleration
    }

    /// A copy of the vehicle's full state.
    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Integrates the vehicle's position and velocity with explicit Euler.
    ///
    /// The position is advanced with the velocity from *before* this step,
    /// then the velocity is advanced with the new acceleration.
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds, must be positive
    /// * `control_input` - The commanded acceleration in m/s^2
    pub fn update(&mut self, dt: f64, control_input: f64) {
        assert!(dt > 0.0, "time step must be positive, found {}", dt);

        let state = &mut self.state;
        state.acceleration = control_input;
        state.position += state.velocity * dt;
        state.velocity += state.acceleration * dt;
    }
}

impl From<VehicleState> for Vehicle {
    fn from(state: VehicleState) -> Self {
        Self { state }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn initial_conditions() {
        let veh = Vehicle::new(10.0, 5.0, 1.0);
        assert_eq!(veh.position(), 10.0);
        assert_eq!(veh.velocity(), 5.0);
        assert_eq!(veh.acceleration(), 1.0);

        let veh = Vehicle::default();
        assert_eq!(veh.state(), VehicleState::default());
    }

    #[test]
    fn zero_acceleration() {
        let mut veh = Vehicle::new(0.0, 10.0, 0.0);
        veh.update(1.0, 0.0);
        assert_eq!(veh.position(), 10.0);
        assert_eq!(veh.velocity(), 10.0);
    }

    #[test]
    fn position_uses_velocity_before_update() {
        let mut veh = Vehicle::new(0.0, 0.0, 0.0);

        veh.update(1.0, 2.0);
        assert_eq!(veh.position(), 0.0);
        assert_eq!(veh.velocity(), 2.0);
        assert_eq!(veh.acceleration(), 2.0);

        veh.update(1.0, 2.0);
        assert_eq!(veh.position(), 2.0);
        assert_eq!(veh.velocity(), 4.0);
    }

    #[test]
    #[should_panic]
    fn rejects_non_positive_time_step() {
        Vehicle::default().update(0.0, 1.0);
    }
}
