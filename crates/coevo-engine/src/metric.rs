//! Exact fitness metrics
//!
//! A metric computes the true error of a solution against training data,
//! either over every row or over a subsample of row indices. Failures are
//! returned as NaN.

use coevo_common::TrainingData;

/// Anything that maps an input row to a prediction
pub trait Model {
    fn predict(&self, row: &[f64]) -> f64;
}

/// Error measure of a solution against training data
pub trait FitnessMetric<S>: Send + Sync {
    /// Error over the full data set
    fn evaluate(&self, solution: &S, data: &TrainingData) -> f64;

    /// Error over the rows named by `indices`; NaN if any index is out of range
    fn evaluate_subset(&self, solution: &S, data: &TrainingData, indices: &[usize]) -> f64;
}

/// Mean absolute error between predictions and targets
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAbsoluteError;

impl MeanAbsoluteError {
    fn mean_error<'a, S: Model>(
        solution: &S,
        rows: impl Iterator<Item = Option<(&'a [f64], f64)>>,
    ) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for row in rows {
            let Some((x, y)) = row else {
                return f64::NAN;
            };
            let prediction = solution.predict(x);
            if !prediction.is_finite() {
                return f64::NAN;
            }
            total += (prediction - y).abs();
            count += 1;
        }
        if count == 0 {
            return f64::NAN;
        }
        total / count as f64
    }
}

impl<S: Model> FitnessMetric<S> for MeanAbsoluteError {
    fn evaluate(&self, solution: &S, data: &TrainingData) -> f64 {
        Self::mean_error(solution, data.iter().map(Some))
    }

    fn evaluate_subset(&self, solution: &S, data: &TrainingData, indices: &[usize]) -> f64 {
        Self::mean_error(
            solution,
            indices
                .iter()
                .map(|&i| data.row(i).zip(data.target(i))),
        )
    }
}
