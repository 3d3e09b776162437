use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

use crate::ConfigError;

/// A strictly positive, finite `f64` parameter.
///
/// Used for every multiplier-like setting: Bollinger deviation, Waddah
/// sensitivity, SAR step sizes, tick size. The constructor panics if the
/// value is zero, negative, infinite or NaN; [`Factor::try_new`] reports
/// the same conditions as a [`ConfigError`].
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct Factor(f64);

impl Factor {
    /// Creates a new factor.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero, negative, infinite or NaN.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        assert!(!value.is_nan(), "factor must not be NaN");
        assert!(value.is_finite(), "factor must be finite");
        assert!(value > 0.0, "factor must be positive");
        Self(value)
    }

    /// Creates a new factor, naming `parameter` in the error on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveFactor`] if `value` is zero,
    /// negative, infinite or NaN.
    pub fn try_new(parameter: &'static str, value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::NonPositiveFactor { parameter, value })
        }
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Factor {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Factor {}

impl Hash for Factor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative, finite `f64` level: dead zones and marker offsets.
///
/// Same bit-level `Eq`/`Hash` as [`Factor`], but zero is allowed.
#[derive(Clone, Copy, Debug)]
pub struct Threshold(f64);

impl Threshold {
    /// Creates a new threshold.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative, infinite or NaN.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        assert!(
            value.is_finite() && value >= 0.0,
            "threshold must be non-negative and finite"
        );
        Self(value)
    }

    /// Creates a new threshold, naming `parameter` in the error on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Negative`] if `value` is negative, infinite
    /// or NaN.
    pub fn try_new(parameter: &'static str, value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::Negative { parameter, value })
        }
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Threshold {}

impl Hash for Threshold {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
