//! Coevolution island configuration

use std::str::FromStr;

use coevo_common::{ConfigError, Result};
use coevo_engine::IslandSettings;
use serde::{Deserialize, Serialize};

/// Parameters of one coevolution island
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IslandConfig {
    /// Size of the solution population
    pub solution_pop_size: usize,
    /// Crossover probability for the solution population
    pub solution_cx: f64,
    /// Mutation probability for the solution population
    pub solution_mut: f64,
    /// Size of the fitness predictor population
    pub predictor_pop_size: usize,
    /// Crossover probability for the fitness predictor population
    pub predictor_cx: f64,
    /// Mutation probability for the fitness predictor population
    pub predictor_mut: f64,
    /// Target share of evaluation cost spent on predictor evolution
    pub predictor_ratio: f64,
    /// Solution generations between best-predictor refreshes
    pub predictor_update_freq: u64,
    /// Size of the trainer population
    pub trainer_pop_size: usize,
    /// Predictor generations between trainer replacements
    pub trainer_update_freq: u64,
    /// Draws allowed per trainer slot during the initial trainer search
    pub trainer_search_budget: usize,
    /// Master RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            solution_pop_size: coevo_common::DEFAULT_SOLUTION_POP_SIZE,
            solution_cx: coevo_common::DEFAULT_SOLUTION_CX,
            solution_mut: coevo_common::DEFAULT_SOLUTION_MUT,
            predictor_pop_size: coevo_common::DEFAULT_PREDICTOR_POP_SIZE,
            predictor_cx: coevo_common::DEFAULT_PREDICTOR_CX,
            predictor_mut: coevo_common::DEFAULT_PREDICTOR_MUT,
            predictor_ratio: coevo_common::DEFAULT_PREDICTOR_RATIO,
            predictor_update_freq: coevo_common::DEFAULT_PREDICTOR_UPDATE_FREQ,
            trainer_pop_size: coevo_common::DEFAULT_TRAINER_POP_SIZE,
            trainer_update_freq: coevo_common::DEFAULT_TRAINER_UPDATE_FREQ,
            trainer_search_budget: coevo_common::DEFAULT_TRAINER_SEARCH_BUDGET,
            seed: None,
        }
    }
}

impl IslandConfig {
    /// Load configuration from `.env` and `COEVO_*` environment variables
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();
        env_override("COEVO_SOLUTION_POP_SIZE", &mut cfg.solution_pop_size)?;
        env_override("COEVO_SOLUTION_CX", &mut cfg.solution_cx)?;
        env_override("COEVO_SOLUTION_MUT", &mut cfg.solution_mut)?;
        env_override("COEVO_PREDICTOR_POP_SIZE", &mut cfg.predictor_pop_size)?;
        env_override("COEVO_PREDICTOR_CX", &mut cfg.predictor_cx)?;
        env_override("COEVO_PREDICTOR_MUT", &mut cfg.predictor_mut)?;
        env_override("COEVO_PREDICTOR_RATIO", &mut cfg.predictor_ratio)?;
        env_override("COEVO_PREDICTOR_UPDATE_FREQ", &mut cfg.predictor_update_freq)?;
        env_override("COEVO_TRAINER_POP_SIZE", &mut cfg.trainer_pop_size)?;
        env_override("COEVO_TRAINER_UPDATE_FREQ", &mut cfg.trainer_update_freq)?;
        env_override("COEVO_TRAINER_SEARCH_BUDGET", &mut cfg.trainer_search_budget)?;

        if let Ok(seed) = std::env::var("COEVO_SEED") {
            cfg.seed = Some(parse_env("COEVO_SEED", &seed)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject parameters the scheduler cannot work with
    pub fn validate(&self) -> Result<()> {
        self.solution_settings().validate()?;
        self.predictor_settings().validate()?;

        if !(0.0..1.0).contains(&self.predictor_ratio) {
            return Err(ConfigError::InvalidPredictorRatio(self.predictor_ratio).into());
        }
        let counts = [
            ("predictor_update_freq", self.predictor_update_freq as usize),
            ("trainer_update_freq", self.trainer_update_freq as usize),
            ("trainer_pop_size", self.trainer_pop_size),
            ("trainer_search_budget", self.trainer_search_budget),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ConfigError::ZeroParameter { name }.into());
            }
        }
        Ok(())
    }

    /// Engine settings for the solution population
    pub fn solution_settings(&self) -> IslandSettings {
        IslandSettings::new(self.solution_pop_size, self.solution_cx, self.solution_mut)
    }

    /// Engine settings for the predictor population
    pub fn predictor_settings(&self) -> IslandSettings {
        IslandSettings::new(self.predictor_pop_size, self.predictor_cx, self.predictor_mut)
    }
}

/// Settings of the demo runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of generated data points
    pub data_size: usize,
    /// Lower end of the sampled input range
    pub range_low: f64,
    /// Upper end of the sampled input range (exclusive)
    pub range_high: f64,
    /// Maximum number of solution generations
    pub max_steps: u64,
    /// Stop once the best pareto-front error falls below this
    pub epsilon: f64,
    /// Maximum expression tree depth
    pub max_depth: usize,
    /// Rows sampled by each fitness predictor
    pub subsample_size: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            data_size: 100,
            range_low: -3.0,
            range_high: 3.0,
            max_steps: 10_000,
            epsilon: 0.01,
            max_depth: 6,
            subsample_size: 32,
        }
    }
}

impl RunnerConfig {
    /// Load runner settings from `.env` and `COEVO_RUN_*` environment variables
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();
        env_override("COEVO_RUN_DATA_SIZE", &mut cfg.data_size)?;
        env_override("COEVO_RUN_RANGE_LOW", &mut cfg.range_low)?;
        env_override("COEVO_RUN_RANGE_HIGH", &mut cfg.range_high)?;
        env_override("COEVO_RUN_MAX_STEPS", &mut cfg.max_steps)?;
        env_override("COEVO_RUN_EPSILON", &mut cfg.epsilon)?;
        env_override("COEVO_RUN_MAX_DEPTH", &mut cfg.max_depth)?;
        env_override("COEVO_RUN_SUBSAMPLE_SIZE", &mut cfg.subsample_size)?;
        Ok(cfg)
    }
}

fn env_override<T: FromStr>(key: &str, target: &mut T) -> Result<()> {
    if let Ok(value) = std::env::var(key) {
        *target = parse_env(key, &value)?;
    }
    Ok(())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}
