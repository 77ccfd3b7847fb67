//! Probability mass function over a list of items
//!
//! Weighted random sampling used to pick node kinds and other discrete
//! choices. Weights are validated once at construction (and on every
//! insertion); a bad weighting is a configuration error, never a silent
//! fallback.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::error;

use crate::error::{ConfigError, Result};

/// Tolerance for the normalized weights summing to one
const NORMALIZATION_TOLERANCE: f64 = 1e-8;

/// Weighted collection of items that can be sampled at random
#[derive(Debug, Clone)]
pub struct ProbabilityMassFunction<T> {
    items: Vec<T>,
    total_weight: f64,
    normalized_weights: Vec<f64>,
    sampler: Option<WeightedIndex<f64>>,
}

impl<T> ProbabilityMassFunction<T> {
    /// Create a PMF; `None` weights give every item the same probability
    pub fn new(items: Vec<T>, weights: Option<Vec<f64>>) -> Result<Self> {
        let weights = match weights {
            Some(w) => w,
            None => Self::default_weights(items.len()),
        };
        if weights.len() != items.len() {
            error!(
                items = items.len(),
                weights = weights.len(),
                "ProbabilityMassFunction built from items and weights of different length"
            );
            return Err(ConfigError::WeightLengthMismatch {
                items: items.len(),
                weights: weights.len(),
            }
            .into());
        }

        let (total_weight, normalized_weights) = Self::normalize(&weights)?;
        let sampler = Self::build_sampler(&normalized_weights)?;
        Ok(Self {
            items,
            total_weight,
            normalized_weights,
            sampler,
        })
    }

    /// Add an item; without a weight it receives the mean current weight
    pub fn add_item(&mut self, item: T, weight: Option<f64>) -> Result<()> {
        let new_weight = weight.unwrap_or_else(|| self.mean_weight());
        let mut weights: Vec<f64> = self
            .normalized_weights
            .iter()
            .map(|w| w * self.total_weight)
            .collect();
        weights.push(new_weight);

        let (total_weight, normalized_weights) = Self::normalize(&weights)?;
        let sampler = Self::build_sampler(&normalized_weights)?;
        self.items.push(item);
        self.total_weight = total_weight;
        self.normalized_weights = normalized_weights;
        self.sampler = sampler;
        Ok(())
    }

    /// Draw one item according to the weights; `None` when empty
    pub fn draw_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        self.sampler
            .as_ref()
            .map(|sampler| &self.items[sampler.sample(rng)])
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn normalized_weights(&self) -> &[f64] {
        &self.normalized_weights
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn default_weights(n: usize) -> Vec<f64> {
        vec![1.0 / n as f64; n]
    }

    fn mean_weight(&self) -> f64 {
        if self.normalized_weights.is_empty() {
            1.0
        } else {
            self.total_weight / self.normalized_weights.len() as f64
        }
    }

    fn normalize(weights: &[f64]) -> Result<(f64, Vec<f64>)> {
        if let Some((index, &value)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            error!(index, value, "ProbabilityMassFunction built from non-numeric weights");
            return Err(ConfigError::NonNumericWeight { index, value }.into());
        }
        if weights.is_empty() {
            return Ok((0.0, Vec::new()));
        }

        let total: f64 = weights.iter().sum();
        if weights.iter().any(|w| *w < 0.0) {
            error!(?weights, "Negative weights encountered in ProbabilityMassFunction");
            return Err(ConfigError::InvalidWeights { total }.into());
        }
        let normalized: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let sum: f64 = normalized.iter().sum();
        let valid = (sum - 1.0).abs() <= NORMALIZATION_TOLERANCE
            && normalized.iter().all(|w| *w >= 0.0);
        if !valid {
            error!(?weights, "Invalid weights encountered in ProbabilityMassFunction");
            return Err(ConfigError::InvalidWeights { total }.into());
        }
        Ok((total, normalized))
    }

    fn build_sampler(normalized: &[f64]) -> Result<Option<WeightedIndex<f64>>> {
        if normalized.is_empty() {
            return Ok(None);
        }
        WeightedIndex::new(normalized.iter().copied())
            .map(Some)
            .map_err(|_| ConfigError::InvalidWeights { total: normalized.iter().sum() }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoevoError;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_weights_are_uniform() {
        let pmf = ProbabilityMassFunction::new(vec!['a', 'b', 'c', 'd'], None).unwrap();
        for w in pmf.normalized_weights() {
            assert!((w - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_mismatched_lengths() {
        let err = ProbabilityMassFunction::new(vec![1, 2, 3], Some(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(
            err,
            CoevoError::Config(ConfigError::WeightLengthMismatch { items: 3, weights: 2 })
        ));
    }

    #[test]
    fn test_non_numeric_weight() {
        let err =
            ProbabilityMassFunction::new(vec![1, 2], Some(vec![1.0, f64::NAN])).unwrap_err();
        assert!(matches!(
            err,
            CoevoError::Config(ConfigError::NonNumericWeight { index: 1, .. })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = ProbabilityMassFunction::new(vec![1, 2], Some(vec![2.0, -1.0]));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_total_rejected() {
        let result = ProbabilityMassFunction::new(vec![1, 2], Some(vec![0.0, 0.0]));
        assert!(result.is_err());
    }

    #[test]
    fn test_add_item_uses_mean_weight() {
        let mut pmf = ProbabilityMassFunction::new(vec![1, 2], Some(vec![1.0, 3.0])).unwrap();
        pmf.add_item(3, None).unwrap();
        // weights become [1, 3, 2] -> total 6
        assert!((pmf.total_weight() - 6.0).abs() < 1e-12);
        assert!((pmf.normalized_weights()[2] - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_add_item_to_empty() {
        let mut pmf: ProbabilityMassFunction<u8> = ProbabilityMassFunction::new(vec![], None).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pmf.draw_sample(&mut rng).is_none());

        pmf.add_item(7, None).unwrap();
        assert_eq!(pmf.draw_sample(&mut rng), Some(&7));
    }

    #[test]
    fn test_failed_add_leaves_pmf_untouched() {
        let mut pmf = ProbabilityMassFunction::new(vec![1, 2], None).unwrap();
        assert!(pmf.add_item(3, Some(f64::INFINITY)).is_err());
        assert_eq!(pmf.len(), 2);
    }

    #[test]
    fn test_zero_weight_item_never_drawn() {
        let pmf = ProbabilityMassFunction::new(vec!["x", "y"], Some(vec![0.0, 1.0])).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            assert_eq!(pmf.draw_sample(&mut rng), Some(&"y"));
        }
    }

    proptest! {
        #[test]
        fn prop_normalized_weights_sum_to_one(weights in prop::collection::vec(0.0f64..1000.0, 1..40)) {
            prop_assume!(weights.iter().sum::<f64>() > 0.0);
            let items: Vec<usize> = (0..weights.len()).collect();
            let pmf = ProbabilityMassFunction::new(items, Some(weights)).unwrap();
            let sum: f64 = pmf.normalized_weights().iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-8);
            prop_assert!(pmf.normalized_weights().iter().all(|w| *w >= 0.0));
        }

        #[test]
        fn prop_length_mismatch_always_fails(n_items in 0usize..20, n_weights in 0usize..20) {
            prop_assume!(n_items != n_weights);
            let result = ProbabilityMassFunction::new(vec![0u8; n_items], Some(vec![1.0; n_weights]));
            prop_assert!(result.is_err());
        }
    }
}
