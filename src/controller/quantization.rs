//! Sensor quantization.

/// Resolutions at or below this value disable quantization.
pub const MIN_RESOLUTION: f64 = 1e-6;

/// Rounds `value` to the nearest multiple of `resolution`, modelling the
/// granularity of a sensor. Ties are rounded to the even multiple.
///
/// A `resolution` at or below [MIN_RESOLUTION] returns `value` unchanged.
pub fn quantize(value: f64, resolution: f64) -> f64 {
    if resolution <= MIN_RESOLUTION {
        return value;
    }
    (value / resolution).round_ties_even() * resolution
}
