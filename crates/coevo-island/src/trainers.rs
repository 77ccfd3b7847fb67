//! Trainer set: fixed-capacity ring of solutions with known true fitness
//!
//! ## Overwrite policy
//!
//! Replacement never grows the ring. The slot overwritten for a solution
//! generation age is
//!
//! ```text
//! slot = floor(age / update_freq) mod len
//! ```
//!
//! so consecutive update periods walk the ring round-robin and every slot is
//! overwritten once per `update_freq * len` generations.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A solution genome paired with its exact fitness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer<S> {
    pub genome: S,
    /// Exact metric value, computed once when the trainer was captured
    pub true_fitness: f64,
}

impl<S> Trainer<S> {
    pub fn new(genome: S, true_fitness: f64) -> Self {
        Self {
            genome,
            true_fitness,
        }
    }
}

/// Ring of trainers used to score fitness predictors
#[derive(Debug, Clone)]
pub struct TrainerSet<S> {
    trainers: Vec<Trainer<S>>,
    update_freq: u64,
    /// Bumped on every mutation
    version: u64,
    last_replaced: Option<usize>,
}

impl<S: Clone> TrainerSet<S> {
    /// Empty set; `update_freq` must be non-zero
    pub fn new(update_freq: u64) -> Self {
        Self {
            trainers: Vec::new(),
            update_freq: update_freq.max(1),
            version: 0,
            last_replaced: None,
        }
    }

    pub fn len(&self) -> usize {
        self.trainers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trainers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trainer<S>> {
        self.trainers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trainer<S>> {
        self.trainers.iter()
    }

    pub fn update_freq(&self) -> u64 {
        self.update_freq
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Slot overwritten by the last [`TrainerSet::replace_for_age`]
    pub fn last_replaced(&self) -> Option<usize> {
        self.last_replaced
    }

    /// Append a trainer (initial fill and appending loads)
    pub fn push(&mut self, trainer: Trainer<S>) {
        self.trainers.push(trainer);
        self.version += 1;
    }

    /// Slot targeted for `age`; `None` when the ring is empty
    pub fn slot_for_age(&self, age: u64) -> Option<usize> {
        if self.trainers.is_empty() {
            return None;
        }
        Some(((age / self.update_freq) % self.trainers.len() as u64) as usize)
    }

    /// Overwrite the slot targeted for `age`, returning it
    pub fn replace_for_age(&mut self, age: u64, trainer: Trainer<S>) -> Option<usize> {
        let slot = self.slot_for_age(age)?;
        self.trainers[slot] = trainer;
        self.version += 1;
        self.last_replaced = Some(slot);
        Some(slot)
    }

    /// Mean absolute difference between each trainer's true fitness and
    /// `estimate` of its genome; NaN when empty or any estimate fails
    pub fn mean_absolute_error(&self, mut estimate: impl FnMut(&S) -> f64) -> f64 {
        if self.trainers.is_empty() {
            return f64::NAN;
        }
        let total: f64 = self
            .trainers
            .iter()
            .map(|t| (t.true_fitness - estimate(&t.genome)).abs())
            .sum();
        total / self.trainers.len() as f64
    }

    /// (genome, true fitness) pairs at `subset` (all when `None`), in ring order
    pub fn dump(&mut self, subset: Option<&[usize]>, with_removal: bool) -> Vec<(S, f64)> {
        let selected: HashSet<usize> = match subset {
            Some(indices) => indices.iter().copied().collect(),
            None => (0..self.trainers.len()).collect(),
        };
        let dumped = self
            .trainers
            .iter()
            .enumerate()
            .filter(|(i, _)| selected.contains(i))
            .map(|(_, t)| (t.genome.clone(), t.true_fitness))
            .collect();

        if with_removal {
            let mut index = 0;
            self.trainers.retain(|_| {
                let keep = !selected.contains(&index);
                index += 1;
                keep
            });
            self.version += 1;
        }
        dumped
    }

    /// Load (genome, true fitness) pairs, replacing or appending
    pub fn load(&mut self, pairs: Vec<(S, f64)>, replace: bool) {
        if replace {
            self.trainers.clear();
        }
        self.trainers
            .extend(pairs.into_iter().map(|(genome, fit)| Trainer::new(genome, fit)));
        self.version += 1;
    }
}
