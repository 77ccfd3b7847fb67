//! Fitness values: an error measure paired with a complexity score
//!
//! Lower error is better. `NaN` marks an evaluation failure and always ranks
//! worst; ties on error are broken by lower complexity.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Evaluated fitness of an individual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    /// Error measure (lower is better, NaN on failure)
    pub error: f64,
    /// Complexity score (0 for scalar-only fitness)
    pub complexity: f64,
}

impl Fitness {
    pub fn new(error: f64, complexity: f64) -> Self {
        Self { error, complexity }
    }

    /// Fitness with no complexity component
    pub fn scalar(error: f64) -> Self {
        Self::new(error, 0.0)
    }

    /// Whether the evaluation failed
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.error.is_nan()
    }

    /// Ranking key; `OrderedFloat` sorts NaN above every number
    fn key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
        (OrderedFloat(self.error), OrderedFloat(self.complexity))
    }

    /// Total order used for selection
    pub fn rank(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }

    /// Whether `self` is at least as good as `other`
    pub fn is_at_least_as_good(&self, other: &Self) -> bool {
        self.rank(other) != Ordering::Greater
    }

    /// Pareto dominance over (error, complexity); failed evaluations never dominate
    pub fn dominates(&self, other: &Self) -> bool {
        if self.is_nan() {
            return false;
        }
        if other.is_nan() {
            return true;
        }
        self.error <= other.error
            && self.complexity <= other.complexity
            && (self.error < other.error || self.complexity < other.complexity)
    }
}

impl std::fmt::Display for Fitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {})", self.error, self.complexity)
    }
}
