//! Population snapshots for persistence and migration between islands
//!
//! A snapshot holds the three populations of an island: solution genomes,
//! predictor genomes, and (trainer genome, true fitness) pairs. The cached
//! best predictor is deliberately absent; it is recomputed on load.

use coevo_common::{CoevoError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable dump of an island's populations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot<S, P> {
    /// Island the snapshot was taken from
    pub source: Uuid,
    /// Capture time (Unix milliseconds)
    pub taken_at: i64,
    pub solutions: Vec<S>,
    pub predictors: Vec<P>,
    pub trainers: Vec<(S, f64)>,
}

impl<S, P> PopulationSnapshot<S, P> {
    pub fn new(
        source: Uuid,
        solutions: Vec<S>,
        predictors: Vec<P>,
        trainers: Vec<(S, f64)>,
    ) -> Self {
        Self {
            source,
            taken_at: chrono::Utc::now().timestamp_millis(),
            solutions,
            predictors,
            trainers,
        }
    }

    /// Total number of genomes across the three lists
    pub fn len(&self) -> usize {
        self.solutions.len() + self.predictors.len() + self.trainers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S, P> PopulationSnapshot<S, P>
where
    S: Serialize + DeserializeOwned,
    P: Serialize + DeserializeOwned,
{
    /// Compact binary encoding; preserves NaN trainer fitness
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| CoevoError::Snapshot(format!("Failed to decode snapshot: {}", e)))
    }

    /// Human-readable encoding
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CoevoError::Snapshot(format!("Failed to parse snapshot: {}", e)))
    }
}
