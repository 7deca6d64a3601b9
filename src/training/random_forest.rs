//! Random forest regressor (bagged decision trees)

use crate::error::{PipelineError, Result};
use crate::training::decision_tree::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Regression forest: bootstrap-sampled trees averaged at prediction time.
/// Each tree gets a seed derived from the forest seed so fits are
/// reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub random_state: Option<u64>,
    n_features: usize,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            random_state: None,
            n_features: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Fit the forest to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        self.n_features = x.ncols();
        let max_features = ((self.n_features as f64).sqrt().ceil() as usize).max(1);
        let base_seed = self.random_state.unwrap_or(42);

        let trees: Vec<DecisionTree> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                let sample_indices: Vec<usize> = (0..n_samples)
                    .map(|_| (rng.next_u64() as usize) % n_samples)
                    .collect();

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = DecisionTree::new()
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }
                tree.max_features = Some(max_features);
                tree.fit(&x_boot, &y_boot).ok();

                tree
            })
            .collect();

        self.trees = trees;
        Ok(self)
    }

    /// Average tree predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(PipelineError::ModelNotFitted);
        }

        let mut totals = Array1::zeros(x.nrows());
        let mut counted = 0usize;
        for tree in &self.trees {
            if let Ok(pred) = tree.predict(x) {
                totals = totals + pred;
                counted += 1;
            }
        }

        if counted == 0 {
            return Err(PipelineError::TrainingError(
                "no tree in the forest produced predictions".to_string(),
            ));
        }

        Ok(totals / counted as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [1.0],
            [2.0],
            [3.0],
            [4.0],
            [10.0],
            [11.0],
            [12.0],
            [13.0]
        ];
        let y = array![5.0, 5.0, 5.0, 5.0, 20.0, 20.0, 20.0, 20.0];
        (x, y)
    }

    #[test]
    fn test_forest_fits_step_function() {
        let (x, y) = step_data();
        let mut forest = RandomForest::new(20).with_random_state(42);
        forest.fit(&x, &y).unwrap();

        let pred = forest.predict(&array![[2.0], [12.0]]).unwrap();
        assert!(pred[0] < 12.0, "low step predicted {}", pred[0]);
        assert!(pred[1] > 12.0, "high step predicted {}", pred[1]);
    }

    #[test]
    fn test_seeded_fit_is_deterministic() {
        let (x, y) = step_data();

        let mut a = RandomForest::new(10).with_random_state(7);
        a.fit(&x, &y).unwrap();
        let mut b = RandomForest::new(10).with_random_state(7);
        b.fit(&x, &y).unwrap();

        let pa = a.predict(&x).unwrap();
        let pb = b.predict(&x).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let forest = RandomForest::new(5);
        assert!(matches!(
            forest.predict(&array![[1.0]]),
            Err(PipelineError::ModelNotFitted)
        ));
    }
}
