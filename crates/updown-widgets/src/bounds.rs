//! Minimum/maximum policy for numeric values.

use crate::error::NumericError;
use serde::{Deserialize, Serialize};

/// The `[minimum, maximum]` range of a numeric input.
///
/// `minimum <= maximum` holds at all times: each bound is coerced against
/// the other when set instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    minimum: f64,
    maximum: f64,
    minimum_set: bool,
    maximum_set: bool,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            minimum: f64::MIN,
            maximum: f64::MAX,
            minimum_set: false,
            maximum_set: false,
        }
    }
}

impl Bounds {
    /// Unbounded range `[f64::MIN, f64::MAX]`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower bound.
    #[must_use]
    pub const fn minimum(&self) -> f64 {
        self.minimum
    }

    /// Upper bound.
    #[must_use]
    pub const fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Lower bound if it was explicitly set.
    #[must_use]
    pub const fn explicit_minimum(&self) -> Option<f64> {
        if self.minimum_set {
            Some(self.minimum)
        } else {
            None
        }
    }

    /// Upper bound if it was explicitly set.
    #[must_use]
    pub const fn explicit_maximum(&self) -> Option<f64> {
        if self.maximum_set {
            Some(self.maximum)
        } else {
            None
        }
    }

    /// Set the lower bound, coerced to at most the current maximum.
    ///
    /// Returns `true` if the stored minimum changed.
    pub fn set_minimum(&mut self, requested: f64) -> bool {
        let coerced = requested.min(self.maximum);
        self.minimum_set = true;
        let changed = coerced != self.minimum;
        self.minimum = coerced;
        changed
    }

    /// Set the upper bound, coerced to at least the current minimum.
    ///
    /// Returns `true` if the stored maximum changed.
    pub fn set_maximum(&mut self, requested: f64) -> bool {
        let coerced = requested.max(self.minimum);
        self.maximum_set = true;
        let changed = coerced != self.maximum;
        self.maximum = coerced;
        changed
    }

    /// Whether `value` lies inside the range. NaN is never out of range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        !(value < self.minimum || value > self.maximum)
    }

    /// Constrain `value` to the nearest bound. NaN passes through.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.minimum {
            self.minimum
        } else if value > self.maximum {
            self.maximum
        } else {
            value
        }
    }

    /// Apply the range policy to a candidate value.
    ///
    /// With `clip` the value is clamped; without it an out-of-range value is
    /// a [`NumericError::Range`].
    pub fn apply(&self, value: f64, clip: bool) -> Result<f64, NumericError> {
        if clip {
            Ok(self.clamp(value))
        } else if self.contains(value) {
            Ok(value)
        } else {
            Err(NumericError::Range {
                value,
                minimum: self.minimum,
                maximum: self.maximum,
            })
        }
    }
}
