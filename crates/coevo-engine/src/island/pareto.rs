//! Pareto front over (error, complexity)

use super::individual::Individual;
use crate::genome::Genome;

/// Non-dominated members, sorted by ascending error
///
/// Failed evaluations never enter the front, and members with identical
/// objective values are kept only once.
pub fn non_dominated<G: Genome>(members: &[Individual<G>]) -> Vec<Individual<G>> {
    let evaluated: Vec<_> = members
        .iter()
        .filter_map(|m| m.fitness().filter(|f| !f.is_nan()).map(|f| (m, f)))
        .collect();

    let mut front: Vec<Individual<G>> = Vec::new();
    for (member, fitness) in &evaluated {
        let dominated = evaluated.iter().any(|(_, other)| other.dominates(fitness));
        let duplicate = front.iter().any(|f| f.fitness() == Some(*fitness));
        if !dominated && !duplicate {
            front.push((*member).clone());
        }
    }
    front.sort_by(|a, b| match (a.fitness(), b.fitness()) {
        (Some(fa), Some(fb)) => fa.rank(&fb),
        _ => std::cmp::Ordering::Equal,
    });
    front
}
