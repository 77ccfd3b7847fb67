//! Population member with an epoch-stamped fitness cache

use coevo_common::Fitness;

use crate::genome::Genome;

/// A genome together with its cached fitness
#[derive(Debug, Clone)]
pub struct Individual<G> {
    genome: G,
    fitness: Option<Fitness>,
    /// Island fitness epoch the cached fitness was computed in
    epoch: u64,
}

impl<G: Genome> Individual<G> {
    /// Unevaluated individual
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: None,
            epoch: 0,
        }
    }

    pub(crate) fn evaluated(genome: G, fitness: Fitness, epoch: u64) -> Self {
        Self {
            genome,
            fitness: Some(fitness),
            epoch,
        }
    }

    pub fn genome(&self) -> &G {
        &self.genome
    }

    pub fn into_genome(self) -> G {
        self.genome
    }

    /// Last computed fitness, current or not
    pub fn fitness(&self) -> Option<Fitness> {
        self.fitness
    }

    /// Whether the cached fitness belongs to `epoch`
    pub fn is_current_in(&self, epoch: u64) -> bool {
        self.fitness.is_some() && self.epoch == epoch
    }

    pub fn complexity(&self) -> usize {
        self.genome.complexity()
    }

    pub(crate) fn set_fitness(&mut self, fitness: Fitness, epoch: u64) {
        self.fitness = Some(fitness);
        self.epoch = epoch;
    }
}

impl<G: Genome> std::fmt::Display for Individual<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fitness {
            Some(fitness) => write!(f, "{} {}", fitness, self.genome),
            None => write!(f, "(unevaluated) {}", self.genome),
        }
    }
}
