//! Coevolution island: solution, fitness predictor and trainer populations
//!
//! The solution population is scored by a cached copy of the best fitness
//! predictor. Predictors are scored by how well they reproduce the true
//! fitness of a small ring of trainers. Each call to
//! [`CoevolutionIsland::generational_step`] first evolves predictors until
//! their share of the evaluation cost reaches the configured ratio, then
//! advances the solution population by one generation.

use std::sync::Arc;

use coevo_common::{ConfigError, Fitness, Result, TrainerError, TrainingData};
use coevo_engine::{
    FitnessMetric, Genome, Individual, Island, Manipulator, PredictorManipulator, Scorable,
};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::IslandConfig;
use crate::fitness::{EvaluationContext, PredictorFitness, SurrogateFitness, TrueFitness};
use crate::snapshot::PopulationSnapshot;
use crate::trainers::{Trainer, TrainerSet};

/// Which fitness function the solution population is currently using
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Estimated by the cached best predictor
    Surrogate,
    /// Exact metric over the full training data; terminal once entered
    Exact,
}

/// Island coevolving solutions, fitness predictors and trainers
pub struct CoevolutionIsland<SM, PM>
where
    SM: Manipulator,
    PM: PredictorManipulator,
    PM::Genome: Scorable<SM::Genome>,
{
    id: Uuid,
    context: EvaluationContext<SM::Genome>,
    solution_island: Island<SM>,
    predictor_island: Island<PM>,
    trainers: Arc<RwLock<TrainerSet<SM::Genome>>>,
    best_predictor: Arc<RwLock<PM::Genome>>,
    predictor_ratio: f64,
    predictor_update_freq: u64,
    trainer_update_freq: u64,
    scoring: ScoringMode,
    rng: StdRng,
}

/// Population variance; NaN when empty or when any value is not finite
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

impl<SM, PM> CoevolutionIsland<SM, PM>
where
    SM: Manipulator,
    PM: PredictorManipulator,
    PM::Genome: Scorable<SM::Genome>,
{
    /// Build an island and its initial trainer set
    ///
    /// Fails on invalid configuration, or when no legal trainer can be found
    /// for some slot within `trainer_search_budget` draws.
    pub fn new(
        data: TrainingData,
        solution_manipulator: SM,
        mut predictor_manipulator: PM,
        metric: Arc<dyn FitnessMetric<SM::Genome>>,
        config: &IslandConfig,
    ) -> Result<Self> {
        config.validate()?;
        if data.is_empty() {
            return Err(ConfigError::InvalidData("training data is empty".to_string()).into());
        }

        // a predictor cannot subsample more rows than exist
        if data.size() < predictor_manipulator.max_index() {
            debug!(
                max_index = predictor_manipulator.max_index(),
                data_size = data.size(),
                "clamping predictor max index to data size"
            );
            predictor_manipulator.clamp_max_index(data.size());
        }

        let id = Uuid::now_v7();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let context = EvaluationContext::new(metric, Arc::new(data));
        let trainers = Arc::new(RwLock::new(TrainerSet::new(config.trainer_update_freq)));

        let predictor_island = Island::new(
            predictor_manipulator,
            Box::new(PredictorFitness::new(context.clone(), Arc::clone(&trainers))),
            &config.predictor_settings().with_seed(rng.gen()),
        )?;

        // placeholder until trainers exist and predictors can be ranked
        let placeholder = predictor_island
            .population()
            .first()
            .map(|p| p.genome().clone())
            .ok_or(ConfigError::ZeroParameter {
                name: "predictor_pop_size",
            })?;
        let best_predictor = Arc::new(RwLock::new(placeholder));
        let solution_island = Island::new(
            solution_manipulator,
            Box::new(SurrogateFitness::new(
                context.clone(),
                Arc::clone(&best_predictor),
            )),
            &config.solution_settings().with_seed(rng.gen()),
        )?;

        let mut island = Self {
            id,
            context,
            solution_island,
            predictor_island,
            trainers,
            best_predictor,
            predictor_ratio: config.predictor_ratio,
            predictor_update_freq: config.predictor_update_freq,
            trainer_update_freq: config.trainer_update_freq,
            scoring: ScoringMode::Surrogate,
            rng,
        };

        island.init_trainers(config.trainer_pop_size, config.trainer_search_budget)?;
        island.refresh_best_predictor();

        info!(
            island = %island.id,
            solutions = island.solution_island.len(),
            predictors = island.predictor_island.len(),
            trainers = config.trainer_pop_size,
            "coevolution island initialized"
        );
        island.trace_predictor();
        island.solution_island.update_pareto_front();
        island.trace_solution();
        Ok(island)
    }

    /// Fill the trainer set by rejection sampling from the solution population
    fn init_trainers(&mut self, count: usize, budget: usize) -> Result<()> {
        for slot in 0..count {
            let mut found = None;
            for _ in 0..budget {
                let index = self.rng.gen_range(0..self.solution_island.len());
                let candidate = self.solution_island.population()[index].genome();
                let true_fitness = self.solution_fitness_true(candidate);
                if self.is_legal_trainer(candidate, true_fitness) {
                    found = Some(Trainer::new(candidate.clone(), true_fitness));
                    break;
                }
            }
            match found {
                Some(trainer) => self.trainers.write().push(trainer),
                None => {
                    warn!(slot, budget, "initial trainer search exhausted");
                    return Err(TrainerError::SearchExhausted {
                        slot,
                        attempts: budget,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// A trainer needs a defined true fitness that every predictor can estimate
    fn is_legal_trainer(&self, candidate: &SM::Genome, true_fitness: f64) -> bool {
        !true_fitness.is_nan()
            && self
                .predictor_island
                .population()
                .iter()
                .all(|p| !self.context.estimate(p.genome(), candidate).is_nan())
    }

    /// Solution fitness estimated by the cached best predictor
    pub fn solution_fitness_estimate(&self, solution: &SM::Genome) -> Fitness {
        let estimate = self
            .context
            .estimate(&*self.best_predictor.read(), solution);
        Fitness::new(estimate, solution.complexity() as f64)
    }

    /// Mean absolute error of `predictor` against every current trainer
    pub fn predictor_fitness(&self, predictor: &PM::Genome) -> f64 {
        self.context
            .predictor_error(predictor, &self.trainers.read())
    }

    /// Exact fitness from the metric, bypassing every predictor
    pub fn solution_fitness_true(&self, solution: &SM::Genome) -> f64 {
        self.context.true_fitness(solution)
    }

    /// Exact fitness paired with complexity
    pub fn true_fitness_plus_complexity(&self, solution: &SM::Genome) -> Fitness {
        Fitness::new(
            self.solution_fitness_true(solution),
            solution.complexity() as f64,
        )
    }

    /// Replace a trainer with the solution the predictors disagree on most
    ///
    /// The slot is chosen by the solution generation age (see
    /// [`TrainerSet::slot_for_age`]). Unlike the initial search, the new
    /// trainer is not required to be scorable by every predictor.
    #[instrument(skip(self), fields(island = %self.id))]
    pub fn add_new_trainer(&mut self) {
        let population = self.solution_island.population();
        if population.is_empty() {
            warn!("no solutions to draw a trainer from");
            return;
        }

        let mut best_index = 0;
        let mut max_variance = 0.0;
        for (index, member) in population.iter().enumerate() {
            let estimates: Vec<f64> = self
                .predictor_island
                .population()
                .iter()
                .map(|p| self.context.estimate(p.genome(), member.genome()))
                .collect();
            // NaN never beats the running maximum
            let var = variance(&estimates);
            if var > max_variance {
                max_variance = var;
                best_index = index;
            }
        }

        let genome = population[best_index].genome().clone();
        let true_fitness = self.solution_fitness_true(&genome);
        let age = self.solution_island.age();
        let slot = self
            .trainers
            .write()
            .replace_for_age(age, Trainer::new(genome, true_fitness));
        self.predictor_island.invalidate_fitness();

        debug!(?slot, age, variance = max_variance, true_fitness, "updating trainer");
    }

    /// Swap the cached best predictor for the current best member
    fn refresh_best_predictor(&mut self) {
        let Some(best) = self.predictor_island.best_individual() else {
            warn!("predictor population is empty; keeping cached predictor");
            return;
        };
        let genome = best.genome().clone();
        *self.best_predictor.write() = genome;
        self.solution_island.invalidate_fitness();
    }

    /// Share of the weighted evaluation cost spent on predictors
    ///
    /// One solution evaluation is weighted as `1 / len(trainers)` of a
    /// predictor evaluation. Before any evaluation the ratio is zero.
    pub fn current_ratio(&self) -> f64 {
        let predictor_evals = self.predictor_island.fitness_evals() as f64;
        let solution_evals = self.solution_island.fitness_evals() as f64;
        let cost = self.trainers.read().len() as f64;
        if cost == 0.0 || predictor_evals + solution_evals == 0.0 {
            return 0.0;
        }
        predictor_evals / (predictor_evals + solution_evals / cost)
    }

    /// Advance the solution population one generation, evolving predictors
    /// first as needed to keep their cost share at the target ratio
    #[instrument(skip(self), fields(island = %self.id))]
    pub fn generational_step(&mut self) {
        let mut ratio = self.current_ratio();
        while ratio < self.predictor_ratio {
            if self.trainers.read().is_empty() || self.predictor_island.is_empty() {
                warn!("cannot evolve predictors without trainers and predictors");
                break;
            }
            if (self.predictor_island.age() + 1) % self.trainer_update_freq == 0 {
                self.add_new_trainer();
            }

            let evals = self.predictor_island.fitness_evals();
            self.predictor_island.generational_step();
            self.trace_predictor();
            if self.predictor_island.fitness_evals() == evals {
                warn!("predictor step made no evaluations; stopping predictor evolution");
                break;
            }
            ratio = self.current_ratio();
        }

        if (self.solution_island.age() + 1) % self.predictor_update_freq == 0 {
            debug!("updating predictor");
            self.refresh_best_predictor();
        }

        self.solution_island.generational_step();
        self.solution_island.update_pareto_front();
        self.trace_solution();
    }

    /// Dump the three populations, optionally removing what was dumped
    ///
    /// `None` subsets select the whole population.
    pub fn dump_populations(
        &mut self,
        s_subset: Option<&[usize]>,
        p_subset: Option<&[usize]>,
        t_subset: Option<&[usize]>,
        with_removal: bool,
    ) -> PopulationSnapshot<SM::Genome, PM::Genome> {
        let solutions = self.solution_island.dump_population(s_subset, with_removal);
        let predictors = self.predictor_island.dump_population(p_subset, with_removal);
        let trainers = self.trainers.write().dump(t_subset, with_removal);
        if with_removal {
            self.predictor_island.invalidate_fitness();
        }
        debug!(
            solutions = solutions.len(),
            predictors = predictors.len(),
            trainers = trainers.len(),
            with_removal,
            "dumped populations"
        );
        PopulationSnapshot::new(self.id, solutions, predictors, trainers)
    }

    /// Load populations from a snapshot, replacing or appending
    ///
    /// The cached best predictor is always recomputed from the loaded
    /// predictor population.
    pub fn load_populations(
        &mut self,
        snapshot: PopulationSnapshot<SM::Genome, PM::Genome>,
        replace: bool,
    ) {
        debug!(
            source = %snapshot.source,
            replace,
            "loading populations"
        );
        self.solution_island
            .load_population(snapshot.solutions, replace);
        self.predictor_island
            .load_population(snapshot.predictors, replace);
        self.trainers.write().load(snapshot.trainers, replace);
        self.predictor_island.invalidate_fitness();

        self.refresh_best_predictor();
    }

    /// Score solutions with the exact metric from now on
    pub fn use_true_fitness(&mut self) {
        self.solution_island
            .set_fitness_strategy(Box::new(TrueFitness::new(self.context.clone())));
        self.solution_island.invalidate_fitness();
        self.scoring = ScoringMode::Exact;
        info!(island = %self.id, "switched solution population to true fitness");
    }

    /// Emit one `T>` line per trainer
    pub fn log_trainers(&self) {
        for (index, trainer) in self.trainers.read().iter().enumerate() {
            debug!("T> {} {} {}", index, trainer.true_fitness, trainer.genome);
        }
    }

    fn trace_predictor(&mut self) {
        let age = self.predictor_island.age();
        if let Some(best) = self.predictor_island.best_individual() {
            let fitness = best.fitness().map_or(f64::NAN, |f| f.error);
            debug!("P> {} {} {}", age, fitness, best.genome());
        }
    }

    fn trace_solution(&self) {
        if let Some(best) = self.solution_island.pareto_front().first() {
            let fitness = best.fitness().map_or(f64::NAN, |f| f.error);
            debug!("S> {} {} {}", self.solution_island.age(), fitness, best.genome());
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.scoring
    }

    pub fn solution_age(&self) -> u64 {
        self.solution_island.age()
    }

    pub fn predictor_age(&self) -> u64 {
        self.predictor_island.age()
    }

    pub fn solution_evals(&self) -> u64 {
        self.solution_island.fitness_evals()
    }

    pub fn predictor_evals(&self) -> u64 {
        self.predictor_island.fitness_evals()
    }

    pub fn predictor_ratio(&self) -> f64 {
        self.predictor_ratio
    }

    pub fn training_data(&self) -> &TrainingData {
        &self.context.data
    }

    pub fn solution_population(&self) -> &[Individual<SM::Genome>] {
        self.solution_island.population()
    }

    pub fn predictor_population(&self) -> &[Individual<PM::Genome>] {
        self.predictor_island.population()
    }

    /// Pareto front of the solution population as of the last step
    pub fn pareto_front(&self) -> &[Individual<SM::Genome>] {
        self.solution_island.pareto_front()
    }

    /// Copy of the cached best predictor
    pub fn best_predictor(&self) -> PM::Genome {
        self.best_predictor.read().clone()
    }

    /// Copy of the current trainers, in ring order
    pub fn trainers(&self) -> Vec<Trainer<SM::Genome>> {
        self.trainers.read().iter().cloned().collect()
    }

    pub fn trainer_count(&self) -> usize {
        self.trainers.read().len()
    }

    /// Ring slot overwritten by the most recent trainer replacement
    pub fn last_replaced_trainer(&self) -> Option<usize> {
        self.trainers.read().last_replaced()
    }

    /// Whether solution `index` holds a fitness from the current surrogate
    pub fn is_solution_fitness_current(&self, index: usize) -> bool {
        self.solution_island.is_fitness_current(index)
    }

    /// Whether predictor `index` holds a fitness from the current trainers
    pub fn is_predictor_fitness_current(&self, index: usize) -> bool {
        self.predictor_island.is_fitness_current(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coevo_common::CoevoError;
    use coevo_engine::{
        ExprManipulator, ExprTree, MeanAbsoluteError, Operator, SubsampleGenome,
        SubsampleManipulator,
    };

    type TestIsland = CoevolutionIsland<ExprManipulator, SubsampleManipulator>;

    fn data() -> TrainingData {
        TrainingData::from_pairs((0..50).map(|i| {
            let x = -3.0 + 6.0 * i as f64 / 50.0;
            (x, x * x + 0.5)
        }))
    }

    fn config() -> IslandConfig {
        IslandConfig {
            solution_pop_size: 24,
            predictor_pop_size: 8,
            trainer_pop_size: 4,
            trainer_update_freq: 5,
            predictor_update_freq: 5,
            seed: Some(7),
            ..IslandConfig::default()
        }
    }

    fn solution_manipulator() -> ExprManipulator {
        ExprManipulator::new(1, 5)
            .unwrap()
            .with_operators(&[Operator::Add, Operator::Subtract, Operator::Multiply])
            .unwrap()
    }

    fn island_with(config: &IslandConfig) -> TestIsland {
        CoevolutionIsland::new(
            data(),
            solution_manipulator(),
            SubsampleManipulator::new(8, 50),
            Arc::new(MeanAbsoluteError),
            config,
        )
        .unwrap()
    }

    fn island() -> TestIsland {
        island_with(&config())
    }

    struct NanMetric;

    impl FitnessMetric<ExprTree> for NanMetric {
        fn evaluate(&self, _solution: &ExprTree, _data: &TrainingData) -> f64 {
            f64::NAN
        }

        fn evaluate_subset(&self, _: &ExprTree, _: &TrainingData, _: &[usize]) -> f64 {
            f64::NAN
        }
    }

    #[test]
    fn test_variance() {
        assert_eq!(variance(&[2.0, 2.0, 2.0]), 0.0);
        assert!((variance(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
        assert!(variance(&[1.0, f64::NAN]).is_nan());
        assert!(variance(&[1.0, f64::INFINITY]).is_nan());
        assert!(variance(&[]).is_nan());
    }

    #[test]
    fn test_construction() {
        let island = island();
        assert_eq!(island.trainer_count(), 4);
        assert_eq!(island.solution_population().len(), 24);
        assert_eq!(island.predictor_population().len(), 8);
        assert_eq!(island.scoring_mode(), ScoringMode::Surrogate);
        for trainer in island.trainers() {
            assert!(!trainer.true_fitness.is_nan());
            assert_eq!(trainer.true_fitness, island.solution_fitness_true(&trainer.genome));
        }
    }

    #[test]
    fn test_initial_trainers_scorable_by_every_predictor() {
        let island = island();
        for trainer in island.trainers() {
            for predictor in island.predictor_population() {
                let estimate = predictor
                    .genome()
                    .score(&trainer.genome, &MeanAbsoluteError, island.training_data());
                assert!(!estimate.is_nan());
            }
        }
    }

    #[test]
    fn test_max_index_clamped_to_data_size() {
        let island = CoevolutionIsland::new(
            data(),
            solution_manipulator(),
            SubsampleManipulator::new(8, 1000),
            Arc::new(MeanAbsoluteError),
            &config(),
        )
        .unwrap();
        assert_eq!(island.predictor_island.manipulator().max_index(), 50);
        assert!(island
            .predictor_population()
            .iter()
            .all(|p| p.genome().indices.iter().all(|i| *i < 50)));
    }

    #[test]
    fn test_unsatisfiable_trainer_search_reports_failure() {
        let config = IslandConfig {
            trainer_search_budget: 25,
            ..config()
        };
        let result = CoevolutionIsland::new(
            data(),
            solution_manipulator(),
            SubsampleManipulator::new(8, 50),
            Arc::new(NanMetric),
            &config,
        );
        assert!(matches!(
            result,
            Err(CoevoError::Trainer(TrainerError::SearchExhausted {
                slot: 0,
                attempts: 25
            }))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = IslandConfig {
            predictor_ratio: 1.5,
            ..config()
        };
        let result = CoevolutionIsland::new(
            data(),
            solution_manipulator(),
            SubsampleManipulator::new(8, 50),
            Arc::new(MeanAbsoluteError),
            &config,
        );
        assert!(matches!(result, Err(CoevoError::Config(_))));
    }

    #[test]
    fn test_best_predictor_initialized_from_population_best() {
        let mut island = island();
        let best = island
            .predictor_island
            .best_individual()
            .map(|b| b.genome().clone())
            .unwrap();
        assert_eq!(island.best_predictor(), best);
    }

    #[test]
    fn test_estimate_uses_cached_predictor() {
        let island = island();
        let solution = island.solution_population()[0].genome().clone();
        let expected = island
            .best_predictor()
            .score(&solution, &MeanAbsoluteError, island.training_data());
        let estimate = island.solution_fitness_estimate(&solution);
        assert_eq!(estimate.error.to_bits(), expected.to_bits());
        assert_eq!(estimate.complexity, solution.size() as f64);
    }

    #[test]
    fn test_predictor_fitness_is_mean_over_trainers() {
        let island = island();
        let predictor = island.predictor_population()[0].genome().clone();
        let trainers = island.trainers();
        let expected = trainers
            .iter()
            .map(|t| {
                (t.true_fitness
                    - predictor.score(&t.genome, &MeanAbsoluteError, island.training_data()))
                .abs()
            })
            .sum::<f64>()
            / trainers.len() as f64;
        let fitness = island.predictor_fitness(&predictor);
        assert!(fitness >= 0.0);
        assert!((fitness - expected).abs() < 1e-12);
    }

    #[test]
    fn test_add_new_trainer_keeps_length_and_invalidates_predictors() {
        let mut island = island();
        island.predictor_island.evaluate_stale();
        for _ in 0..10 {
            island.add_new_trainer();
            assert_eq!(island.trainer_count(), 4);
            assert!((0..8).all(|i| !island.is_predictor_fitness_current(i)));
            island.predictor_island.evaluate_stale();
        }
    }

    #[test]
    fn test_new_trainer_has_exact_fitness() {
        let mut island = island();
        island.add_new_trainer();
        let slot = island.last_replaced_trainer().unwrap();
        let trainer = &island.trainers()[slot];
        let exact = island.solution_fitness_true(&trainer.genome);
        assert_eq!(trainer.true_fitness.to_bits(), exact.to_bits());
    }

    #[test]
    fn test_trainer_slots_cycle_with_solution_age() {
        let mut island = island();
        let freq = 5;
        let mut hits = vec![0; 4];
        for age in 0..(freq * 4) {
            assert_eq!(island.solution_age(), age);
            if age % freq == 0 {
                island.add_new_trainer();
                let slot = island.last_replaced_trainer().unwrap();
                assert_eq!(slot as u64, (age / freq) % 4);
                hits[slot] += 1;
            }
            island.solution_island.generational_step();
        }
        assert_eq!(hits, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_step_advances_solution_once() {
        let mut island = island();
        for expected_age in 1..=12 {
            let solution_evals = island.solution_evals();
            let predictor_evals = island.predictor_evals();
            island.generational_step();
            assert_eq!(island.solution_age(), expected_age);
            assert!(island.solution_evals() > solution_evals);
            assert!(island.predictor_evals() >= predictor_evals);
        }
        assert!(!island.pareto_front().is_empty());
    }

    #[test]
    fn test_predictor_refresh_invalidates_solutions() {
        let mut island = island();
        // next solution age 5 triggers a refresh on this step
        for _ in 0..4 {
            island.generational_step();
        }
        let epoch = island.solution_island.epoch();
        island.generational_step();
        assert!(island.solution_island.epoch() > epoch);

        let best = island
            .predictor_island
            .best_individual()
            .map(|b| b.genome().clone())
            .unwrap();
        island.refresh_best_predictor();
        assert_eq!(island.best_predictor(), best);
        assert!((0..24).all(|i| !island.is_solution_fitness_current(i)));
    }

    #[test]
    fn test_trainer_replaced_when_predictor_age_reaches_frequency() {
        // a high ratio runs several predictor generations per solution step
        let mut island = island_with(&IslandConfig {
            predictor_ratio: 0.5,
            ..config()
        });
        let mut replaced = false;
        for _ in 0..40 {
            let version = island.trainers.read().version();
            let predictor_age = island.predictor_age();
            island.generational_step();
            if island.trainers.read().version() != version {
                replaced = true;
                // some predictor step between the two ages hit a multiple of 5
                let new_age = island.predictor_age();
                assert!((predictor_age + 1..=new_age).any(|a| a % 5 == 0));
            }
        }
        assert!(replaced);
    }

    #[test]
    fn test_ratio_tracks_target() {
        let config = IslandConfig {
            trainer_pop_size: 10,
            predictor_ratio: 0.1,
            ..config()
        };
        let mut island = island_with(&config);
        for _ in 0..300 {
            island.generational_step();
        }
        let ratio = island.current_ratio();
        assert!((ratio - 0.1).abs() < 0.02, "ratio {} too far from target", ratio);
    }

    #[test]
    fn test_step_survives_unscorable_predictors() {
        let mut island = island();
        let mut snapshot = island.dump_populations(None, None, None, false);
        snapshot.predictors[0] = SubsampleGenome::new(vec![0, 999]);
        snapshot.predictors[1] = SubsampleGenome::new(vec![999]);
        island.load_populations(snapshot, true);

        let mut age = island.solution_age();
        for _ in 0..20 {
            let evals = island.solution_evals() + island.predictor_evals();
            island.generational_step();
            assert_eq!(island.solution_age(), age + 1);
            assert!(island.solution_evals() + island.predictor_evals() > evals);
            age += 1;
        }
    }

    #[test]
    fn test_round_trip_restores_populations() {
        let mut island = island();
        for _ in 0..6 {
            island.generational_step();
        }
        let before = island.dump_populations(None, None, None, false);

        island.load_populations(before.clone(), true);
        let after = island.dump_populations(None, None, None, false);
        assert_eq!(before.solutions, after.solutions);
        assert_eq!(before.predictors, after.predictors);
        assert_eq!(before.trainers.len(), after.trainers.len());
        for ((g1, f1), (g2, f2)) in before.trainers.iter().zip(after.trainers.iter()) {
            assert_eq!(g1, g2);
            assert_eq!(f1.to_bits(), f2.to_bits());
        }

        let reloaded_best = island
            .predictor_island
            .best_individual()
            .map(|b| b.genome().clone())
            .unwrap();
        assert_eq!(island.best_predictor(), reloaded_best);
    }

    #[test]
    fn test_dump_with_removal() {
        let mut island = island();
        let snapshot = island.dump_populations(Some(&[0, 1]), Some(&[2]), Some(&[3]), true);
        assert_eq!(snapshot.solutions.len(), 2);
        assert_eq!(snapshot.predictors.len(), 1);
        assert_eq!(snapshot.trainers.len(), 1);
        assert_eq!(snapshot.source, island.id());
        assert_eq!(island.solution_population().len(), 22);
        assert_eq!(island.predictor_population().len(), 7);
        assert_eq!(island.trainer_count(), 3);

        island.load_populations(snapshot, false);
        assert_eq!(island.solution_population().len(), 24);
        assert_eq!(island.predictor_population().len(), 8);
        assert_eq!(island.trainer_count(), 4);
    }

    #[test]
    fn test_migration_between_islands() {
        let mut source = island();
        let mut target = island_with(&IslandConfig {
            seed: Some(99),
            ..config()
        });
        let migrants = source.dump_populations(Some(&[0, 1, 2]), Some(&[]), Some(&[]), true);
        let bytes = migrants.to_bytes().unwrap();
        target.load_populations(PopulationSnapshot::from_bytes(&bytes).unwrap(), false);
        assert_eq!(target.solution_population().len(), 27);
        assert_eq!(source.solution_population().len(), 21);
        target.generational_step();
        source.generational_step();
    }

    #[test]
    fn test_use_true_fitness() {
        let mut island = island();
        island.generational_step();
        island.use_true_fitness();
        assert_eq!(island.scoring_mode(), ScoringMode::Exact);
        assert!((0..24).all(|i| !island.is_solution_fitness_current(i)));

        island.generational_step();
        for member in island.solution_population() {
            let fitness = member.fitness().unwrap();
            let exact = island.true_fitness_plus_complexity(member.genome());
            assert_eq!(fitness.error.to_bits(), exact.error.to_bits());
            assert_eq!(fitness.complexity, exact.complexity);
        }
    }

    #[test]
    fn test_log_trainers_does_not_mutate() {
        let island = island();
        let before = island.trainers();
        island.log_trainers();
        assert_eq!(before, island.trainers());
    }
}
