//! Miscellaneous utility structs and functions.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A closed interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> Interval<T> {
    /// Saturates `value` to the interval.
    ///
    /// The upper bound is applied first, so if `min > max` the result is `min`.
    pub fn clamp(&self, value: T) -> T {
        let value = if value > self.max { self.max } else { value };
        if value < self.min {
            self.min
        } else {
            value
        }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}
