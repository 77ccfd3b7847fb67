//! Coevolution Runner Binary
//!
//! Fits `y = x^2 + 0.5` with a single coevolution island.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coevo_common::{TrainingData, VERSION};
use coevo_engine::{ExprManipulator, MeanAbsoluteError, Operator, SubsampleManipulator};
use coevo_island::{CoevolutionIsland, IslandConfig, RunnerConfig};

const OPERATORS: [Operator; 9] = [
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::Divide,
    Operator::Sin,
    Operator::Cos,
    Operator::Exp,
    Operator::Log,
    Operator::Abs,
];

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting coevolution runner v{}", VERSION);

    let config = IslandConfig::load()?;
    let run = RunnerConfig::load()?;
    info!("Loaded configuration: {:?}", config);
    info!("Runner settings: {:?}", run);

    let step = (run.range_high - run.range_low) / run.data_size as f64;
    let data = TrainingData::from_pairs((0..run.data_size).map(|i| {
        let x = run.range_low + step * i as f64;
        (x, x * x + 0.5)
    }));

    let solutions = ExprManipulator::new(1, run.max_depth)?.with_operators(&OPERATORS)?;
    let predictors = SubsampleManipulator::new(run.subsample_size, run.data_size);
    let mut island = CoevolutionIsland::new(
        data,
        solutions,
        predictors,
        Arc::new(MeanAbsoluteError),
        &config,
    )?;

    while island.solution_age() < run.max_steps {
        island.generational_step();
        let converged = island
            .pareto_front()
            .first()
            .and_then(|best| best.fitness())
            .is_some_and(|f| f.error < run.epsilon);
        if converged {
            info!(age = island.solution_age(), "surrogate error below epsilon");
            break;
        }
    }

    island.use_true_fitness();
    island.generational_step();
    island.log_trainers();

    for member in island.pareto_front() {
        info!(
            fitness = %member.fitness().map_or(f64::NAN, |f| f.error),
            complexity = member.complexity(),
            "{}",
            member.genome()
        );
    }
    info!(
        solution_evals = island.solution_evals(),
        predictor_evals = island.predictor_evals(),
        ratio = island.current_ratio(),
        "run complete"
    );
    Ok(())
}
