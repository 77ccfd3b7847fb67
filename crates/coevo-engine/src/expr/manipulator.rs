//! Random generation and variation of expression trees

use coevo_common::{ProbabilityMassFunction, Result};
use rand::Rng;
use tracing::trace;

use super::{ExprTree, Node, Operator};
use crate::genome::Manipulator;

/// Builds and varies [`ExprTree`] genomes
///
/// Operators are drawn through a [`ProbabilityMassFunction`], so weighting
/// the operator set biases the search toward the forms expected in the data.
#[derive(Debug, Clone)]
pub struct ExprManipulator {
    n_vars: usize,
    max_depth: usize,
    operators: ProbabilityMassFunction<Operator>,
    constant_range: (f64, f64),
    terminal_prob: f64,
}

impl ExprManipulator {
    /// Manipulator for `n_vars` inputs with trees at most `max_depth` deep
    pub fn new(n_vars: usize, max_depth: usize) -> Result<Self> {
        Ok(Self {
            n_vars,
            max_depth: max_depth.max(1),
            operators: ProbabilityMassFunction::new(Vec::new(), None)?,
            constant_range: (-10.0, 10.0),
            terminal_prob: 0.3,
        })
    }

    /// Make `op` available; `None` gives it the mean weight of existing operators
    pub fn add_operator(&mut self, op: Operator, weight: Option<f64>) -> Result<()> {
        self.operators.add_item(op, weight)
    }

    /// Builder-style variant of [`ExprManipulator::add_operator`]
    pub fn with_operators(mut self, ops: &[Operator]) -> Result<Self> {
        for op in ops {
            self.add_operator(*op, None)?;
        }
        Ok(self)
    }

    /// Range constants are drawn from
    pub fn with_constant_range(mut self, low: f64, high: f64) -> Self {
        self.constant_range = (low.min(high), low.max(high));
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn random_terminal<R: Rng + ?Sized>(&self, rng: &mut R) -> Node {
        if self.n_vars > 0 && rng.gen_bool(0.5) {
            Node::Variable(rng.gen_range(0..self.n_vars))
        } else {
            self.random_constant(rng)
        }
    }

    fn random_constant<R: Rng + ?Sized>(&self, rng: &mut R) -> Node {
        let (low, high) = self.constant_range;
        if low < high {
            Node::Constant(rng.gen_range(low..high))
        } else {
            Node::Constant(low)
        }
    }

    /// Grow a random subtree no deeper than `budget`
    fn grow<R: Rng + ?Sized>(&self, rng: &mut R, budget: usize) -> Node {
        if budget <= 1 || rng.gen_bool(self.terminal_prob) {
            return self.random_terminal(rng);
        }
        match self.operators.draw_sample(rng).copied() {
            Some(op) if op.arity() == 1 => Node::unary(op, self.grow(rng, budget - 1)),
            Some(op) => Node::binary(op, self.grow(rng, budget - 1), self.grow(rng, budget - 1)),
            None => self.random_terminal(rng),
        }
    }

    fn point_mutation<R: Rng + ?Sized>(&self, node: &mut Node, rng: &mut R) {
        match node {
            Node::Constant(c) => {
                let scale = c.abs().max(1.0);
                *c += rng.gen_range(-0.5..0.5) * scale;
            }
            Node::Variable(_) => *node = self.random_terminal(rng),
            Node::Unary(op, _) | Node::Binary(op, _, _) => {
                let arity = op.arity();
                // only swap for an operator of the same arity
                for _ in 0..self.operators.len() {
                    if let Some(new_op) = self.operators.draw_sample(rng) {
                        if new_op.arity() == arity {
                            *op = *new_op;
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl Manipulator for ExprManipulator {
    type Genome = ExprTree;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ExprTree {
        ExprTree::new(self.grow(rng, self.max_depth))
    }

    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &ExprTree,
        parent2: &ExprTree,
        rng: &mut R,
    ) -> (ExprTree, ExprTree) {
        let pos1 = rng.gen_range(0..parent1.size());
        let pos2 = rng.gen_range(0..parent2.size());

        let (Some(sub1), Some(sub2)) = (parent1.root.subtree(pos1), parent2.root.subtree(pos2))
        else {
            return (parent1.clone(), parent2.clone());
        };

        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();
        if let Some(slot) = child1.root.subtree_mut(pos1) {
            *slot = sub2.clone();
        }
        if let Some(slot) = child2.root.subtree_mut(pos2) {
            *slot = sub1.clone();
        }

        // children deeper than the limit fall back to their parent
        if child1.depth() > self.max_depth {
            child1 = parent1.clone();
        }
        if child2.depth() > self.max_depth {
            child2 = parent2.clone();
        }
        (child1, child2)
    }

    fn mutate<R: Rng + ?Sized>(&self, genome: &ExprTree, rng: &mut R) -> ExprTree {
        let mut child = genome.clone();
        let pos = rng.gen_range(0..child.size());
        let depth = child.root.depth_of(pos).unwrap_or(1);

        if rng.gen_bool(0.5) {
            let budget = self.max_depth.saturating_sub(depth) + 1;
            let subtree = self.grow(rng, budget);
            if let Some(slot) = child.root.subtree_mut(pos) {
                *slot = subtree;
            }
        } else if let Some(slot) = child.root.subtree_mut(pos) {
            self.point_mutation(slot, rng);
        }
        trace!(before = %genome, after = %child, "mutated expression");
        child
    }
}
