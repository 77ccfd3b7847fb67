//! # Coevo Engine
//!
//! Generational population engine and genome representations used by the
//! coevolution island.
//!
//! ## Contracts
//!
//! - [`Genome`] / [`Manipulator`]: a genetic representation and its
//!   generation, crossover, and mutation operators
//! - [`FitnessMetric`]: exact error of a solution against training data
//! - [`Scorable`]: the capability of a predictor to estimate a solution's error
//! - [`FitnessStrategy`]: the fitness function injected into an [`Island`]
//!
//! ## Representations
//!
//! - [`expr`]: expression-tree solutions for symbolic regression
//! - [`predictor`]: subsampling fitness predictors
//!
//! ## Fitness caching
//!
//! Each [`Island`] keeps a fitness epoch. An individual's cached fitness is
//! current only while it was computed in the island's present epoch, so a
//! single [`Island::invalidate_fitness`] call marks the whole population
//! stale without touching the individuals.

pub mod expr;
pub mod genome;
pub mod island;
pub mod metric;
pub mod predictor;
pub mod scoring;

pub use expr::{ExprManipulator, ExprTree, Node, Operator};
pub use genome::{Genome, Manipulator, PredictorManipulator};
pub use island::{Individual, Island, IslandSettings};
pub use metric::{FitnessMetric, MeanAbsoluteError, Model};
pub use predictor::{SubsampleGenome, SubsampleManipulator};
pub use scoring::{FitnessStrategy, Scorable};
