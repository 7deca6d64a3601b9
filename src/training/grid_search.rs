//! Exhaustive cross-validated hyperparameter search

use crate::error::{PipelineError, Result};
use crate::training::catalog::{RegressorKind, TrainedRegressor};
use crate::training::cross_validation::KFold;
use crate::training::metrics::r2_score;
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A hyperparameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
}

impl ParamValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            ParamValue::Int(v) => *v as f64,
            ParamValue::Float(v) => *v,
        }
    }

    pub fn as_usize(&self) -> usize {
        match self {
            ParamValue::Int(v) => (*v).max(0) as usize,
            ParamValue::Float(v) => v.max(0.0) as usize,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A named set of parameter values, e.g. "alpha" -> [0.01, 0.1, 1.0]
pub type ParamSet = Vec<(String, ParamValue)>;

/// Ordered hyperparameter search space. Combination order follows insertion
/// order, so tie-breaking in the search is stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamGrid {
    params: Vec<(String, Vec<ParamValue>)>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add float candidates for a parameter
    pub fn floats(mut self, name: impl Into<String>, values: &[f64]) -> Self {
        self.params.push((
            name.into(),
            values.iter().map(|&v| ParamValue::Float(v)).collect(),
        ));
        self
    }

    /// Add integer candidates for a parameter
    pub fn ints(mut self, name: impl Into<String>, values: &[i64]) -> Self {
        self.params.push((
            name.into(),
            values.iter().map(|&v| ParamValue::Int(v)).collect(),
        ));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Cartesian product of all parameter values, in grid order
    pub fn combinations(&self) -> Vec<ParamSet> {
        let mut combos: Vec<ParamSet> = vec![Vec::new()];

        for (name, values) in &self.params {
            let mut next = Vec::with_capacity(combos.len() * values.len());
            for combo in &combos {
                for value in values {
                    let mut extended = combo.clone();
                    extended.push((name.clone(), *value));
                    next.push(extended);
                }
            }
            combos = next;
        }

        combos
    }
}

/// Result of a grid search
#[derive(Debug, Clone)]
pub struct GridSearchResult {
    pub best_params: ParamSet,
    pub best_score: f64,
}

/// Exhaustive search over a `ParamGrid` scored by k-fold cross-validated R²
/// on the training data only. Combinations are evaluated in parallel;
/// selection scans in grid order so the first maximum wins.
pub struct GridSearch {
    cv_folds: usize,
    random_seed: Option<u64>,
}

impl GridSearch {
    pub fn new(cv_folds: usize, random_seed: Option<u64>) -> Self {
        Self {
            cv_folds,
            random_seed,
        }
    }

    pub fn search(
        &self,
        kind: RegressorKind,
        grid: &ParamGrid,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<GridSearchResult> {
        let combos = grid.combinations();
        if combos.is_empty() {
            return Err(PipelineError::TrainingError(
                "empty hyperparameter grid".to_string(),
            ));
        }

        let mut kfold = KFold::new(self.cv_folds);
        if let Some(seed) = self.random_seed {
            kfold = kfold.with_random_state(seed);
        }
        let splits = kfold.split(x.nrows())?;

        let scores: Vec<Result<f64>> = combos
            .par_iter()
            .map(|params| {
                let mut fold_scores = Vec::with_capacity(splits.len());
                for split in &splits {
                    let x_train = x.select(Axis(0), &split.train_indices);
                    let y_train = Array1::from_vec(
                        split.train_indices.iter().map(|&i| y[i]).collect(),
                    );
                    let x_val = x.select(Axis(0), &split.test_indices);
                    let y_val = Array1::from_vec(
                        split.test_indices.iter().map(|&i| y[i]).collect(),
                    );

                    let mut model = TrainedRegressor::build(kind, params, self.random_seed)?;
                    model.fit(&x_train, &y_train)?;
                    let pred = model.predict(&x_val)?;
                    fold_scores.push(r2_score(&y_val, &pred));
                }
                Ok(fold_scores.iter().sum::<f64>() / fold_scores.len() as f64)
            })
            .collect();

        let mut best_idx = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (idx, score) in scores.into_iter().enumerate() {
            let score = score?;
            if score > best_score {
                best_score = score;
                best_idx = idx;
            }
        }

        Ok(GridSearchResult {
            best_params: combos[best_idx].clone(),
            best_score,
        })
    }
}
