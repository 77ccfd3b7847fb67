//! Fitness adapters injected into the solution and predictor islands
//!
//! - [`SurrogateFitness`]: solution error estimated by the cached best predictor
//! - [`TrueFitness`]: solution error from the exact metric
//! - [`PredictorFitness`]: predictor error against the trainer set
//!
//! The adapters share the cached predictor and the trainer set with the
//! orchestrator through `Arc<RwLock<_>>`, so replacing either is visible to
//! the next evaluation without re-injecting the strategy.

use std::sync::Arc;

use coevo_common::{Fitness, TrainingData};
use coevo_engine::{FitnessMetric, FitnessStrategy, Genome, Scorable};
use parking_lot::RwLock;

use crate::trainers::TrainerSet;

/// Exact metric plus the data it is evaluated on
pub struct EvaluationContext<S> {
    pub metric: Arc<dyn FitnessMetric<S>>,
    pub data: Arc<TrainingData>,
}

impl<S> Clone for EvaluationContext<S> {
    fn clone(&self) -> Self {
        Self {
            metric: Arc::clone(&self.metric),
            data: Arc::clone(&self.data),
        }
    }
}

impl<S> EvaluationContext<S> {
    pub fn new(metric: Arc<dyn FitnessMetric<S>>, data: Arc<TrainingData>) -> Self {
        Self { metric, data }
    }

    /// Exact error of `solution` over the full data set
    pub fn true_fitness(&self, solution: &S) -> f64 {
        self.metric.evaluate(solution, &self.data)
    }

    /// `predictor`'s estimate of `solution`'s error
    pub fn estimate<P: Scorable<S>>(&self, predictor: &P, solution: &S) -> f64 {
        predictor.score(solution, self.metric.as_ref(), &self.data)
    }

    /// Mean absolute error of `predictor` over every trainer
    pub fn predictor_error<P: Scorable<S>>(&self, predictor: &P, trainers: &TrainerSet<S>) -> f64
    where
        S: Clone,
    {
        trainers.mean_absolute_error(|genome| self.estimate(predictor, genome))
    }
}

/// Solution fitness from the cached best predictor, paired with complexity
pub struct SurrogateFitness<S, P> {
    context: EvaluationContext<S>,
    predictor: Arc<RwLock<P>>,
}

impl<S, P> SurrogateFitness<S, P> {
    pub fn new(context: EvaluationContext<S>, predictor: Arc<RwLock<P>>) -> Self {
        Self { context, predictor }
    }
}

impl<S, P> FitnessStrategy<S> for SurrogateFitness<S, P>
where
    S: Genome,
    P: Scorable<S> + Send + Sync,
{
    fn evaluate(&self, solution: &S) -> Fitness {
        let estimate = self.context.estimate(&*self.predictor.read(), solution);
        Fitness::new(estimate, solution.complexity() as f64)
    }
}

/// Solution fitness from the exact metric, paired with complexity
pub struct TrueFitness<S> {
    context: EvaluationContext<S>,
}

impl<S> TrueFitness<S> {
    pub fn new(context: EvaluationContext<S>) -> Self {
        Self { context }
    }
}

impl<S: Genome> FitnessStrategy<S> for TrueFitness<S> {
    fn evaluate(&self, solution: &S) -> Fitness {
        Fitness::new(
            self.context.true_fitness(solution),
            solution.complexity() as f64,
        )
    }
}

/// Predictor fitness: mean absolute error over the trainer set
pub struct PredictorFitness<S> {
    context: EvaluationContext<S>,
    trainers: Arc<RwLock<TrainerSet<S>>>,
}

impl<S> PredictorFitness<S> {
    pub fn new(context: EvaluationContext<S>, trainers: Arc<RwLock<TrainerSet<S>>>) -> Self {
        Self { context, trainers }
    }
}

impl<S, P> FitnessStrategy<P> for PredictorFitness<S>
where
    S: Genome,
    P: Scorable<S>,
{
    fn evaluate(&self, predictor: &P) -> Fitness {
        Fitness::scalar(self.context.predictor_error(predictor, &self.trainers.read()))
    }
}
