//! Training data shared by the solution and predictor populations

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Input rows and target values for symbolic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
}

impl TrainingData {
    /// Create training data, checking that rows and targets line up
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(ConfigError::InvalidData(format!(
                "{} input rows but {} targets",
                x.len(),
                y.len()
            ))
            .into());
        }
        if let Some(width) = x.first().map(Vec::len) {
            if let Some(row) = x.iter().position(|r| r.len() != width) {
                return Err(ConfigError::InvalidData(format!(
                    "row {} has {} columns, expected {}",
                    row,
                    x[row].len(),
                    width
                ))
                .into());
            }
        }
        Ok(Self { x, y })
    }

    /// Single-variable data set from paired samples
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y): (Vec<_>, Vec<_>) = pairs.into_iter().map(|(x, y)| (vec![x], y)).unzip();
        Self { x, y }
    }

    /// Number of rows
    pub fn size(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Number of input columns
    pub fn n_vars(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.x.get(index).map(Vec::as_slice)
    }

    pub fn target(&self, index: usize) -> Option<f64> {
        self.y.get(index).copied()
    }

    /// Iterate over (row, target) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], f64)> {
        self.x.iter().map(Vec::as_slice).zip(self.y.iter().copied())
    }
}
