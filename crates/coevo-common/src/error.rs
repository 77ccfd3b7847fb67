//! Error types for the coevolution workspace
//!
//! Provides a unified error type and domain-specific error variants.
//! Numeric evaluation failures are not errors: they travel as `f64::NAN`
//! and are absorbed by the comparison logic that consumes them.

use thiserror::Error;

/// Result type alias using CoevoError
pub type Result<T> = std::result::Result<T, CoevoError>;

/// Unified error type for coevolution operations
#[derive(Debug, Error)]
pub enum CoevoError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Trainer set errors
    #[error("Trainer error: {0}")]
    Trainer(#[from] TrainerError),

    // Snapshot errors
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Invalid inputs detected at construction time
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Items and weights differ in length: {items} items, {weights} weights")]
    WeightLengthMismatch { items: usize, weights: usize },

    #[error("Non-numeric weight at position {index}: {value}")]
    NonNumericWeight { index: usize, value: f64 },

    #[error("Weights do not normalize to a valid distribution (total {total})")]
    InvalidWeights { total: f64 },

    #[error("Probability {name} out of range [0, 1]: {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("Predictor ratio must lie in [0, 1): {0}")]
    InvalidPredictorRatio(f64),

    #[error("{name} must be greater than zero")]
    ZeroParameter { name: &'static str },

    #[error("Training data is malformed: {0}")]
    InvalidData(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

/// Trainer set maintenance errors
#[derive(Debug, Error, PartialEq)]
pub enum TrainerError {
    #[error("No legal trainer found for slot {slot} after {attempts} draws")]
    SearchExhausted { slot: usize, attempts: usize },
}

impl From<serde_json::Error> for CoevoError {
    fn from(err: serde_json::Error) -> Self {
        CoevoError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for CoevoError {
    fn from(err: bincode::Error) -> Self {
        CoevoError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for CoevoError {
    fn from(err: anyhow::Error) -> Self {
        CoevoError::Internal(err.to_string())
    }
}
