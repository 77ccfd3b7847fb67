//! # Coevo Island
//!
//! Surrogate-assisted symbolic regression by coevolving three populations.
//!
//! ## Key Concepts
//!
//! - **Solutions**: candidate models, scored by a cheap estimate
//! - **Fitness predictors**: row subsamples that estimate a solution's error
//! - **Trainers**: a small ring of solutions with known exact fitness, used
//!   to score the predictors
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 CoevolutionIsland                    │
//! │                                                      │
//! │  ┌──────────────┐  best predictor  ┌──────────────┐  │
//! │  │  Solution    │ <─────────────── │  Predictor   │  │
//! │  │  Island      │                  │  Island      │  │
//! │  └──────┬───────┘                  └──────▲───────┘  │
//! │         │ max predictor variance          │ MAE      │
//! │         │                          ┌──────┴───────┐  │
//! │         └────────────────────────> │  TrainerSet  │  │
//! │                                    └──────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Predictor evolution is throttled so that predictors consume roughly
//! `predictor_ratio` of the weighted evaluation cost.

pub mod coevolution;
pub mod config;
pub mod fitness;
pub mod snapshot;
pub mod trainers;

pub use coevolution::{CoevolutionIsland, ScoringMode};
pub use config::{IslandConfig, RunnerConfig};
pub use fitness::{EvaluationContext, PredictorFitness, SurrogateFitness, TrueFitness};
pub use snapshot::PopulationSnapshot;
pub use trainers::{Trainer, TrainerSet};
