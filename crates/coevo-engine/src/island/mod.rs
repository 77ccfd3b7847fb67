//! Generational population engine
//!
//! An [`Island`] owns one population, its generation age and its cumulative
//! fitness-evaluation count. Each [`Island::generational_step`] pairs the
//! members at random, produces two children per pair by crossover and
//! mutation, and lets each child replace its parent when it is at least as
//! good (deterministic crowding).
//!
//! Fitness comes from an injected [`FitnessStrategy`]. Swapping the strategy
//! requires `&mut self`, so it can never happen in the middle of a step.

mod individual;
pub mod pareto;

use std::collections::HashSet;

use coevo_common::{ConfigError, Fitness, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::genome::Manipulator;
use crate::scoring::FitnessStrategy;

pub use self::individual::Individual;

/// Population size and variation rates of an island
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IslandSettings {
    /// Number of members
    pub pop_size: usize,
    /// Probability a pair of parents is recombined
    pub cx_prob: f64,
    /// Probability a child is mutated
    pub mut_prob: f64,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl IslandSettings {
    pub fn new(pop_size: usize, cx_prob: f64, mut_prob: f64) -> Self {
        Self {
            pop_size,
            cx_prob,
            mut_prob,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pop_size == 0 {
            return Err(ConfigError::ZeroParameter { name: "pop_size" }.into());
        }
        for (name, value) in [("cx_prob", self.cx_prob), ("mut_prob", self.mut_prob)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value }.into());
            }
        }
        Ok(())
    }
}

/// One evolving population
pub struct Island<M: Manipulator> {
    manipulator: M,
    population: Vec<Individual<M::Genome>>,
    strategy: Box<dyn FitnessStrategy<M::Genome>>,
    pareto_front: Vec<Individual<M::Genome>>,
    cx_prob: f64,
    mut_prob: f64,
    age: u64,
    fitness_evals: u64,
    epoch: u64,
    rng: StdRng,
}

impl<M: Manipulator> Island<M> {
    /// Create an island with a freshly generated, unevaluated population
    pub fn new(
        manipulator: M,
        strategy: Box<dyn FitnessStrategy<M::Genome>>,
        settings: &IslandSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let population = (0..settings.pop_size)
            .map(|_| Individual::new(manipulator.generate(&mut rng)))
            .collect();

        Ok(Self {
            manipulator,
            population,
            strategy,
            pareto_front: Vec::new(),
            cx_prob: settings.cx_prob,
            mut_prob: settings.mut_prob,
            age: 0,
            fitness_evals: 0,
            epoch: 0,
            rng,
        })
    }

    pub fn manipulator(&self) -> &M {
        &self.manipulator
    }

    /// Members in index order
    pub fn population(&self) -> &[Individual<M::Genome>] {
        &self.population
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Completed generations
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Cumulative number of fitness evaluations
    pub fn fitness_evals(&self) -> u64 {
        self.fitness_evals
    }

    /// Current fitness epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Replace the injected fitness function
    pub fn set_fitness_strategy(&mut self, strategy: Box<dyn FitnessStrategy<M::Genome>>) {
        self.strategy = strategy;
    }

    /// Mark every cached fitness stale by starting a new epoch
    pub fn invalidate_fitness(&mut self) {
        self.epoch += 1;
        trace!(epoch = self.epoch, "fitness epoch advanced");
    }

    /// Whether member `index` has a fitness computed in the current epoch
    pub fn is_fitness_current(&self, index: usize) -> bool {
        self.population
            .get(index)
            .is_some_and(|m| m.is_current_in(self.epoch))
    }

    /// Evaluate `genome` with the injected strategy, counting the call
    pub fn evaluate(&mut self, genome: &M::Genome) -> Fitness {
        self.fitness_evals += 1;
        self.strategy.evaluate(genome)
    }

    /// Re-evaluate every member whose fitness is stale
    pub fn evaluate_stale(&mut self) {
        for i in 0..self.population.len() {
            if !self.population[i].is_current_in(self.epoch) {
                self.fitness_evals += 1;
                let fitness = self.strategy.evaluate(self.population[i].genome());
                self.population[i].set_fitness(fitness, self.epoch);
            }
        }
    }

    /// Advance one generation
    pub fn generational_step(&mut self) {
        self.evaluate_stale();

        let mut order: Vec<usize> = (0..self.population.len()).collect();
        order.shuffle(&mut self.rng);

        for pair in order.chunks(2) {
            match *pair {
                [i, j] => {
                    let (child1, child2) = if self.rng.gen_bool(self.cx_prob) {
                        self.manipulator.crossover(
                            self.population[i].genome(),
                            self.population[j].genome(),
                            &mut self.rng,
                        )
                    } else {
                        (
                            self.population[i].genome().clone(),
                            self.population[j].genome().clone(),
                        )
                    };
                    let child1 = self.maybe_mutate(child1);
                    let child2 = self.maybe_mutate(child2);
                    self.compete(i, child1);
                    self.compete(j, child2);
                }
                [i] => {
                    let child = self.population[i].genome().clone();
                    let child = self.maybe_mutate(child);
                    self.compete(i, child);
                }
                _ => {}
            }
        }

        self.age += 1;
        debug!(age = self.age, evals = self.fitness_evals, "generation complete");
    }

    fn maybe_mutate(&mut self, genome: M::Genome) -> M::Genome {
        if self.rng.gen_bool(self.mut_prob) {
            self.manipulator.mutate(&genome, &mut self.rng)
        } else {
            genome
        }
    }

    /// Evaluate `child` and let it replace member `index` if at least as good
    fn compete(&mut self, index: usize, child: M::Genome) {
        let fitness = self.evaluate(&child);
        let replace = match self.population[index].fitness() {
            Some(parent) => fitness.is_at_least_as_good(&parent),
            None => true,
        };
        if replace {
            self.population[index] = Individual::evaluated(child, fitness, self.epoch);
        }
    }

    /// Top-ranked member, evaluating stale members first
    pub fn best_individual(&mut self) -> Option<&Individual<M::Genome>> {
        self.evaluate_stale();
        self.population.iter().min_by(|a, b| match (a.fitness(), b.fitness()) {
            (Some(fa), Some(fb)) => fa.rank(&fb),
            _ => std::cmp::Ordering::Equal,
        })
    }

    /// Recompute the pareto front from the current population
    pub fn update_pareto_front(&mut self) {
        self.evaluate_stale();
        self.pareto_front = pareto::non_dominated(&self.population);
    }

    /// Front computed by the last [`Island::update_pareto_front`]
    pub fn pareto_front(&self) -> &[Individual<M::Genome>] {
        &self.pareto_front
    }

    /// Copies of the genomes at `subset` (all when `None`), in population order
    ///
    /// With `with_removal` the dumped members are also deleted.
    pub fn dump_population(
        &mut self,
        subset: Option<&[usize]>,
        with_removal: bool,
    ) -> Vec<M::Genome> {
        let selected: HashSet<usize> = match subset {
            Some(indices) => indices.iter().copied().collect(),
            None => (0..self.population.len()).collect(),
        };
        let dumped = self
            .population
            .iter()
            .enumerate()
            .filter(|(i, _)| selected.contains(i))
            .map(|(_, m)| m.genome().clone())
            .collect();

        if with_removal {
            let mut index = 0;
            self.population.retain(|_| {
                let keep = !selected.contains(&index);
                index += 1;
                keep
            });
        }
        dumped
    }

    /// Load genomes as unevaluated members, replacing or appending
    pub fn load_population(&mut self, genomes: Vec<M::Genome>, replace: bool) {
        if replace {
            self.population.clear();
        }
        self.population
            .extend(genomes.into_iter().map(Individual::new));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{SubsampleGenome, SubsampleManipulator};

    /// Error = sum of indices; drives the population toward index 0
    fn sum_strategy() -> Box<dyn FitnessStrategy<SubsampleGenome>> {
        Box::new(|g: &SubsampleGenome| Fitness::scalar(g.indices.iter().sum::<usize>() as f64))
    }

    fn island(pop_size: usize) -> Island<SubsampleManipulator> {
        let settings = IslandSettings::new(pop_size, 0.5, 0.5).with_seed(17);
        Island::new(SubsampleManipulator::new(4, 20), sum_strategy(), &settings).unwrap()
    }

    #[test]
    fn test_invalid_settings() {
        let settings = IslandSettings::new(4, 1.5, 0.1);
        assert!(Island::new(SubsampleManipulator::new(4, 20), sum_strategy(), &settings).is_err());
        let settings = IslandSettings::new(0, 0.5, 0.1);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_step_advances_counters() {
        let mut island = island(10);
        assert_eq!(island.age(), 0);
        assert_eq!(island.fitness_evals(), 0);

        island.generational_step();
        // 10 stale members + 10 children
        assert_eq!(island.age(), 1);
        assert_eq!(island.fitness_evals(), 20);

        island.generational_step();
        assert_eq!(island.age(), 2);
        assert_eq!(island.fitness_evals(), 30);
    }

    #[test]
    fn test_odd_population_steps() {
        let mut island = island(7);
        island.generational_step();
        assert_eq!(island.len(), 7);
        assert_eq!(island.fitness_evals(), 14);
    }

    #[test]
    fn test_best_never_worsens() {
        let mut island = island(16);
        let mut best = island.best_individual().and_then(|b| b.fitness()).unwrap();
        for _ in 0..30 {
            island.generational_step();
            let next = island.best_individual().and_then(|b| b.fitness()).unwrap();
            assert!(next.is_at_least_as_good(&best));
            best = next;
        }
    }

    #[test]
    fn test_invalidate_marks_all_stale() {
        let mut island = island(8);
        island.generational_step();
        assert!((0..8).all(|i| island.is_fitness_current(i)));

        island.invalidate_fitness();
        assert!((0..8).all(|i| !island.is_fitness_current(i)));

        let evals = island.fitness_evals();
        island.evaluate_stale();
        assert_eq!(island.fitness_evals(), evals + 8);
        assert!((0..8).all(|i| island.is_fitness_current(i)));
    }

    #[test]
    fn test_strategy_swap() {
        let mut island = island(6);
        island.generational_step();
        island.set_fitness_strategy(Box::new(|_: &SubsampleGenome| Fitness::scalar(f64::NAN)));
        island.invalidate_fitness();
        island.evaluate_stale();
        assert!(island
            .population()
            .iter()
            .all(|m| m.fitness().is_some_and(|f| f.is_nan())));
    }

    #[test]
    fn test_dump_subset_with_removal() {
        let mut island = island(5);
        let all = island.dump_population(None, false);
        let dumped = island.dump_population(Some(&[3, 1]), true);
        assert_eq!(dumped, vec![all[1].clone(), all[3].clone()]);
        assert_eq!(island.len(), 3);
        let rest = island.dump_population(None, false);
        assert_eq!(rest, vec![all[0].clone(), all[2].clone(), all[4].clone()]);
    }

    #[test]
    fn test_load_population() {
        let mut island = island(3);
        let genomes = vec![SubsampleGenome::new(vec![0, 0, 0, 0]); 2];
        island.load_population(genomes.clone(), false);
        assert_eq!(island.len(), 5);
        island.load_population(genomes.clone(), true);
        assert_eq!(island.dump_population(None, false), genomes);
        assert!(!island.is_fitness_current(0));
    }

    #[test]
    fn test_pareto_front_updates() {
        let mut island = island(12);
        island.update_pareto_front();
        assert!(!island.pareto_front().is_empty());
        let best = island.best_individual().and_then(|b| b.fitness()).unwrap();
        island.update_pareto_front();
        assert_eq!(island.pareto_front()[0].fitness().unwrap().error, best.error);
    }
}
