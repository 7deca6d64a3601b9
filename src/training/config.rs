//! Training configuration

use serde::{Deserialize, Serialize};

/// Configuration for the evaluation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of cross-validation folds used by grid search
    pub cv_folds: usize,

    /// Minimum acceptable test R² for the selected model; below this the
    /// training run fails instead of persisting a weak model
    pub min_model_score: f64,

    /// Seed for all randomness (fold shuffling, forest bootstrap)
    pub random_seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            cv_folds: 3,
            min_model_score: 0.6,
            random_seed: Some(42),
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the number of CV folds
    pub fn with_cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    /// Builder method to set the minimum acceptable score
    pub fn with_min_model_score(mut self, score: f64) -> Self {
        self.min_model_score = score;
        self
    }

    /// Builder method to set the random seed
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}
