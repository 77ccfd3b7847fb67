//! Generation and variation of subsampling predictors

use rand::Rng;

use super::SubsampleGenome;
use crate::genome::{Manipulator, PredictorManipulator};

/// Builds [`SubsampleGenome`]s of a fixed length over `0..max_index`
#[derive(Debug, Clone)]
pub struct SubsampleManipulator {
    size: usize,
    max_index: usize,
}

impl SubsampleManipulator {
    pub fn new(size: usize, max_index: usize) -> Self {
        Self {
            size: size.max(1),
            max_index: max_index.max(1),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Manipulator for SubsampleManipulator {
    type Genome = SubsampleGenome;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SubsampleGenome {
        SubsampleGenome::new(
            (0..self.size)
                .map(|_| rng.gen_range(0..self.max_index))
                .collect(),
        )
    }

    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &SubsampleGenome,
        parent2: &SubsampleGenome,
        rng: &mut R,
    ) -> (SubsampleGenome, SubsampleGenome) {
        let len = parent1.indices.len().min(parent2.indices.len());
        if len < 2 {
            return (parent1.clone(), parent2.clone());
        }
        let point = rng.gen_range(1..len);
        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();
        child1.indices[point..len].copy_from_slice(&parent2.indices[point..len]);
        child2.indices[point..len].copy_from_slice(&parent1.indices[point..len]);
        (child1, child2)
    }

    fn mutate<R: Rng + ?Sized>(&self, genome: &SubsampleGenome, rng: &mut R) -> SubsampleGenome {
        let mut child = genome.clone();
        if child.indices.is_empty() {
            return child;
        }
        let rate = 1.0 / child.indices.len() as f64;
        let mut changed = false;
        for index in child.indices.iter_mut() {
            if rng.gen_bool(rate) {
                *index = rng.gen_range(0..self.max_index);
                changed = true;
            }
        }
        if !changed {
            let pos = rng.gen_range(0..child.indices.len());
            child.indices[pos] = rng.gen_range(0..self.max_index);
        }
        child
    }
}

impl PredictorManipulator for SubsampleManipulator {
    fn max_index(&self) -> usize {
        self.max_index
    }

    fn clamp_max_index(&mut self, limit: usize) {
        if limit < self.max_index {
            self.max_index = limit.max(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clamp_only_lowers() {
        let mut manip = SubsampleManipulator::new(8, 100);
        manip.clamp_max_index(200);
        assert_eq!(manip.max_index(), 100);
        manip.clamp_max_index(40);
        assert_eq!(manip.max_index(), 40);
    }

    #[test]
    fn test_crossover_swaps_tails() {
        let manip = SubsampleManipulator::new(4, 10);
        let a = SubsampleGenome::new(vec![0, 0, 0, 0]);
        let b = SubsampleGenome::new(vec![1, 1, 1, 1]);
        let mut rng = StdRng::seed_from_u64(2);
        let (c1, c2) = manip.crossover(&a, &b, &mut rng);
        assert_eq!(c1.indices[0], 0);
        assert_eq!(c2.indices[0], 1);
        assert_eq!(c1.indices[3], 1);
        assert_eq!(c2.indices[3], 0);
    }

    proptest! {
        #[test]
        fn prop_indices_stay_in_range(seed in any::<u64>(), size in 1usize..32, max in 1usize..64) {
            let manip = SubsampleManipulator::new(size, max);
            let mut rng = StdRng::seed_from_u64(seed);
            let a = manip.generate(&mut rng);
            let b = manip.mutate(&a, &mut rng);
            let (c, d) = manip.crossover(&a, &b, &mut rng);
            for genome in [&a, &b, &c, &d] {
                prop_assert_eq!(genome.indices.len(), size);
                prop_assert!(genome.indices.iter().all(|i| *i < max));
            }
        }
    }
}
