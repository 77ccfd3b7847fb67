//! Scoring capabilities shared by every population

use coevo_common::{Fitness, TrainingData};

use crate::metric::FitnessMetric;

/// Fitness function injected into a population engine
///
/// Implementations must not fail: an unusable evaluation is reported as a
/// NaN error inside the returned [`Fitness`].
pub trait FitnessStrategy<G>: Send + Sync {
    fn evaluate(&self, genome: &G) -> Fitness;
}

impl<G, F> FitnessStrategy<G> for F
where
    F: Fn(&G) -> Fitness + Send + Sync,
{
    fn evaluate(&self, genome: &G) -> Fitness {
        self(genome)
    }
}

/// Estimates a target's error under `metric`; NaN when it cannot
pub trait Scorable<S> {
    fn score(&self, target: &S, metric: &dyn FitnessMetric<S>, data: &TrainingData) -> f64;
}
