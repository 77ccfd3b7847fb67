//! Subsampling fitness predictors
//!
//! A predictor is a short list of training-data row indices. It estimates a
//! solution's error by evaluating the exact metric on those rows only.

pub mod manipulator;

use std::fmt;

use coevo_common::TrainingData;
use serde::{Deserialize, Serialize};

use crate::genome::Genome;
use crate::metric::FitnessMetric;
use crate::scoring::Scorable;

pub use self::manipulator::SubsampleManipulator;

/// Fitness predictor genome: the rows it subsamples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsampleGenome {
    pub indices: Vec<usize>,
}

impl SubsampleGenome {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}

impl Genome for SubsampleGenome {
    fn complexity(&self) -> usize {
        self.indices.len()
    }
}

impl<S> Scorable<S> for SubsampleGenome {
    fn score(&self, target: &S, metric: &dyn FitnessMetric<S>, data: &TrainingData) -> f64 {
        metric.evaluate_subset(target, data, &self.indices)
    }
}

impl fmt::Display for SubsampleGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FP{:?}", self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{MeanAbsoluteError, Model};

    struct Constant(f64);

    impl Model for Constant {
        fn predict(&self, _row: &[f64]) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_score_uses_subsample_only() {
        let data = TrainingData::from_pairs(vec![(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)]);
        let predictor = SubsampleGenome::new(vec![0, 2]);
        let score = predictor.score(&Constant(0.0), &MeanAbsoluteError, &data);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_malformed_range_scores_nan() {
        let data = TrainingData::from_pairs(vec![(0.0, 0.0)]);
        let predictor = SubsampleGenome::new(vec![0, 4]);
        assert!(predictor
            .score(&Constant(0.0), &MeanAbsoluteError, &data)
            .is_nan());
    }

    #[test]
    fn test_display() {
        assert_eq!(SubsampleGenome::new(vec![3, 1]).to_string(), "FP[3, 1]");
    }
}
