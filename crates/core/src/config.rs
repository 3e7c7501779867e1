//! Tunable generator parameters. Every field has a default so partial files load.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Upper bound on full pipeline attempts before reporting failure.
    pub max_attempts: u32,
    /// Candidate placements tried per search level.
    pub branching_factor: usize,
    /// Cap on solver frames per attempt. `None` searches until exhausted.
    pub search_step_limit: Option<u64>,
    pub noise: NoiseConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 32,
            branching_factor: 3,
            search_step_limit: Some(200_000),
            noise: NoiseConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Lattice cells across the field for each octave.
    pub octaves: Vec<u32>,
    pub floor_min: f64,
    pub floor_max: f64,
    /// Inclusive edge-length range used when no size is requested.
    pub min_size: usize,
    pub max_size: usize,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self { octaves: vec![2, 3], floor_min: 0.4, floor_max: 0.6, min_size: 40, max_size: 59 }
    }
}

impl NoiseConfig {
    pub fn is_floor(&self, value: f64) -> bool {
        value >= self.floor_min && value <= self.floor_max
    }
}
