//! # Coevo Common
//!
//! Shared types, errors, and sampling utilities for the coevolution workspace.
//!
//! ## Core Types
//!
//! - [`TrainingData`]: input rows and target column shared by every population
//! - [`Fitness`]: error value paired with a complexity score
//! - [`ProbabilityMassFunction`]: weighted random sampling over a list of items
//!
//! ## Errors
//!
//! - [`CoevoError`]: unified error type, with [`ConfigError`] and
//!   [`TrainerError`] as domain sub-enums

pub mod data;
pub mod error;
pub mod fitness;
pub mod pmf;

// Re-export commonly used types at crate root
pub use data::TrainingData;
pub use error::{CoevoError, ConfigError, Result, TrainerError};
pub use fitness::Fitness;
pub use pmf::ProbabilityMassFunction;

/// Coevo version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default solution population size
pub const DEFAULT_SOLUTION_POP_SIZE: usize = 64;

/// Default solution crossover probability
pub const DEFAULT_SOLUTION_CX: f64 = 0.7;

/// Default solution mutation probability
pub const DEFAULT_SOLUTION_MUT: f64 = 0.01;

/// Default fitness predictor population size
pub const DEFAULT_PREDICTOR_POP_SIZE: usize = 16;

/// Default fitness predictor crossover probability
pub const DEFAULT_PREDICTOR_CX: f64 = 0.5;

/// Default fitness predictor mutation probability
pub const DEFAULT_PREDICTOR_MUT: f64 = 0.1;

/// Target share of evaluation cost spent on predictor evolution
pub const DEFAULT_PREDICTOR_RATIO: f64 = 0.1;

/// Solution generations between best-predictor refreshes
pub const DEFAULT_PREDICTOR_UPDATE_FREQ: u64 = 50;

/// Default trainer population size
pub const DEFAULT_TRAINER_POP_SIZE: usize = 16;

/// Predictor generations between trainer replacements
pub const DEFAULT_TRAINER_UPDATE_FREQ: u64 = 50;

/// Draws allowed per trainer slot during initial trainer search
pub const DEFAULT_TRAINER_SEARCH_BUDGET: usize = 10_000;
