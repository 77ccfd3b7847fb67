//! Genome and manipulator contracts

use std::fmt::{Debug, Display};

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A genetic representation owned by a population engine
///
/// Clones must be fully independent of their source. Serialization is the
/// persistence format used when populations are dumped and reloaded.
pub trait Genome:
    Clone + Debug + Display + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Complexity score used as the second pareto objective
    fn complexity(&self) -> usize;
}

/// Creates and varies genomes of one representation
pub trait Manipulator: Send + Sync {
    type Genome: Genome;

    /// Generate a random genome
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Genome;

    /// Recombine two parents into two children
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &Self::Genome,
        parent2: &Self::Genome,
        rng: &mut R,
    ) -> (Self::Genome, Self::Genome);

    /// Return a mutated copy of `genome`
    fn mutate<R: Rng + ?Sized>(&self, genome: &Self::Genome, rng: &mut R) -> Self::Genome;
}

/// Manipulator of subsampling genomes, bounded by the rows they may index
pub trait PredictorManipulator: Manipulator {
    /// Exclusive upper bound on generated row indices
    fn max_index(&self) -> usize;

    /// Lower the bound to `limit` if it currently exceeds it
    fn clamp_max_index(&mut self, limit: usize);
}
