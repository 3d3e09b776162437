use thiserror::Error;

/// Rejected configuration value.
///
/// Produced when converting host parameters into typed configs. The typed
/// builders make most of these states unrepresentable; this error covers
/// values arriving from outside the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{parameter} must be at least 1 bar")]
    ZeroPeriod { parameter: &'static str },

    #[error("{parameter} must be positive and finite, got {value}")]
    NonPositiveFactor { parameter: &'static str, value: f64 },

    #[error("{parameter} must be non-negative and finite, got {value}")]
    Negative { parameter: &'static str, value: f64 },

    #[error("psar max step {max_step} is below psar step {step}")]
    MaxStepBelowStep { step: f64, max_step: f64 },
}
