//! Error types.

use thiserror::Error;

/// A parameter that was rejected when constructing a controller, monitor or simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{name}` must be positive and finite, found `{value}`")]
    NotPositive { name: &'static str, value: f64 },

    #[error("`{name}` must be non-negative and finite, found `{value}`")]
    Negative { name: &'static str, value: f64 },

    #[error("The sampling step ({sample_dt} s) must not be shorter than the physics step ({physics_dt} s)")]
    SampleFasterThanPhysics { sample_dt: f64, physics_dt: f64 },

    #[error("The sampling jitter ({jitter} s) must be smaller than the sampling step ({sample_dt} s)")]
    JitterTooLarge { jitter: f64, sample_dt: f64 },
}

/// An error that occurs while loading a parameter file.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Cannot load the parameter file: {0}")]
    FileLoadError(#[from] std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(#[from] toml::de::Error),

    #[error("Cannot merge the parameter file with the defaults: {0}")]
    SerialiseError(#[from] toml::ser::Error),

    #[error("Invalid parameters: {0}")]
    Invalid(#[from] ConfigError),
}

/// Checks that `value` is finite and strictly greater than zero.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Checks that `value` is finite and not less than zero.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
