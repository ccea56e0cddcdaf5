pub use controller::{
    control_law, next_mode, quantize, Controller, ControllerConfig, DelayBuffer, DiscreteMode,
    MeasurementSample, MIN_RESOLUTION,
};
pub use error::{ConfigError, ParamsError};
pub use params::SimulationParams;
pub use safety::{SafetyMonitor, SafetyViolation};
pub use sampler::SampleClock;
pub use scenario::{LeadProfile, Phase};
pub use simulation::{History, Simulation, Summary};
pub use util::Interval;
pub use vehicle::{Vehicle, VehicleState};

mod controller;
mod error;
pub mod logger;
pub mod params;
mod safety;
mod sampler;
mod scenario;
mod simulation;
mod util;
mod vehicle;
