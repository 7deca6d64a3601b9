//! Model catalog
//!
//! The fixed, ordered list of candidate regressors and their hyperparameter
//! search spaces, plus the dispatch enum holding a fitted model.

use crate::error::{PipelineError, Result};
use crate::training::decision_tree::DecisionTree;
use crate::training::grid_search::{ParamGrid, ParamSet, ParamValue};
use crate::training::knn::KnnRegressor;
use crate::training::linear_models::{LassoRegression, LinearRegression, RidgeRegression};
use crate::training::random_forest::RandomForest;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// The kinds of regressor the catalog can instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegressorKind {
    Linear,
    Ridge,
    Lasso,
    Knn,
    DecisionTree,
    RandomForest,
}

/// One catalog entry: display name, model kind, and search space
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: RegressorKind,
    pub grid: ParamGrid,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, kind: RegressorKind, grid: ParamGrid) -> Self {
        Self {
            name: name.into(),
            kind,
            grid,
        }
    }
}

/// The fixed evaluation catalog. Order is part of the contract: the report
/// lists models in this order and selection ties break toward earlier
/// entries.
pub fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("Linear Regression", RegressorKind::Linear, ParamGrid::new()),
        CatalogEntry::new(
            "Ridge",
            RegressorKind::Ridge,
            ParamGrid::new().floats("alpha", &[0.01, 0.1, 1.0, 10.0, 100.0]),
        ),
        CatalogEntry::new(
            "Lasso",
            RegressorKind::Lasso,
            ParamGrid::new().floats("alpha", &[0.01, 0.1, 1.0, 10.0]),
        ),
        CatalogEntry::new(
            "K-Neighbors Regressor",
            RegressorKind::Knn,
            ParamGrid::new().ints("n_neighbors", &[3, 5, 7, 9]),
        ),
        CatalogEntry::new(
            "Decision Tree",
            RegressorKind::DecisionTree,
            ParamGrid::new().ints("max_depth", &[3, 5, 8, 12]),
        ),
        CatalogEntry::new(
            "Random Forest",
            RegressorKind::RandomForest,
            ParamGrid::new()
                .ints("n_estimators", &[50, 100])
                .ints("max_depth", &[5, 10]),
        ),
    ]
}

/// A (possibly fitted) regressor from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedRegressor {
    Linear(LinearRegression),
    Ridge(RidgeRegression),
    Lasso(LassoRegression),
    Knn(KnnRegressor),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl TrainedRegressor {
    /// Instantiate a regressor of the given kind with the given parameters.
    /// An unknown parameter name is a hard error rather than a silent no-op.
    pub fn build(kind: RegressorKind, params: &ParamSet, seed: Option<u64>) -> Result<Self> {
        let mut model = match kind {
            RegressorKind::Linear => TrainedRegressor::Linear(LinearRegression::new()),
            RegressorKind::Ridge => TrainedRegressor::Ridge(RidgeRegression::default()),
            RegressorKind::Lasso => TrainedRegressor::Lasso(LassoRegression::default()),
            RegressorKind::Knn => TrainedRegressor::Knn(KnnRegressor::default()),
            RegressorKind::DecisionTree => {
                TrainedRegressor::DecisionTree(DecisionTree::new())
            }
            RegressorKind::RandomForest => {
                let mut forest = RandomForest::new(100);
                if let Some(seed) = seed {
                    forest = forest.with_random_state(seed);
                }
                TrainedRegressor::RandomForest(forest)
            }
        };

        for (name, value) in params {
            model.apply_param(name, *value)?;
        }

        Ok(model)
    }

    fn apply_param(&mut self, name: &str, value: ParamValue) -> Result<()> {
        match (self, name) {
            (TrainedRegressor::Ridge(m), "alpha") => m.alpha = value.as_f64(),
            (TrainedRegressor::Lasso(m), "alpha") => m.alpha = value.as_f64(),
            (TrainedRegressor::Knn(m), "n_neighbors") => m.n_neighbors = value.as_usize(),
            (TrainedRegressor::DecisionTree(m), "max_depth") => {
                m.max_depth = Some(value.as_usize())
            }
            (TrainedRegressor::RandomForest(m), "n_estimators") => {
                m.n_estimators = value.as_usize()
            }
            (TrainedRegressor::RandomForest(m), "max_depth") => {
                m.max_depth = Some(value.as_usize())
            }
            (model, name) => {
                return Err(PipelineError::TrainingError(format!(
                    "unknown parameter '{}' for {:?}",
                    name,
                    model.kind()
                )))
            }
        }
        Ok(())
    }

    /// Which catalog kind this model is
    pub fn kind(&self) -> RegressorKind {
        match self {
            TrainedRegressor::Linear(_) => RegressorKind::Linear,
            TrainedRegressor::Ridge(_) => RegressorKind::Ridge,
            TrainedRegressor::Lasso(_) => RegressorKind::Lasso,
            TrainedRegressor::Knn(_) => RegressorKind::Knn,
            TrainedRegressor::DecisionTree(_) => RegressorKind::DecisionTree,
            TrainedRegressor::RandomForest(_) => RegressorKind::RandomForest,
        }
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            TrainedRegressor::Linear(m) => m.fit(x, y).map(|_| ()),
            TrainedRegressor::Ridge(m) => m.fit(x, y).map(|_| ()),
            TrainedRegressor::Lasso(m) => m.fit(x, y).map(|_| ()),
            TrainedRegressor::Knn(m) => m.fit(x, y).map(|_| ()),
            TrainedRegressor::DecisionTree(m) => m.fit(x, y).map(|_| ()),
            TrainedRegressor::RandomForest(m) => m.fit(x, y).map(|_| ()),
        }
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            TrainedRegressor::Linear(m) => m.predict(x),
            TrainedRegressor::Ridge(m) => m.predict(x),
            TrainedRegressor::Lasso(m) => m.predict(x),
            TrainedRegressor::Knn(m) => m.predict(x),
            TrainedRegressor::DecisionTree(m) => m.predict(x),
            TrainedRegressor::RandomForest(m) => m.predict(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ParamValue;
    use ndarray::array;

    #[test]
    fn test_catalog_order_is_stable() {
        let catalog = default_catalog();
        let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Linear Regression",
                "Ridge",
                "Lasso",
                "K-Neighbors Regressor",
                "Decision Tree",
                "Random Forest",
            ]
        );
        assert!(catalog[0].grid.is_empty());
        assert!(!catalog[1].grid.is_empty());
    }

    #[test]
    fn test_build_applies_params() {
        let params = vec![("alpha".to_string(), ParamValue::Float(5.0))];
        let model = TrainedRegressor::build(RegressorKind::Ridge, &params, None).unwrap();
        match model {
            TrainedRegressor::Ridge(m) => assert_eq!(m.alpha, 5.0),
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn test_build_rejects_unknown_param() {
        let params = vec![("bogus".to_string(), ParamValue::Int(1))];
        assert!(TrainedRegressor::build(RegressorKind::Linear, &params, None).is_err());
    }

    #[test]
    fn test_fit_predict_dispatch() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model =
            TrainedRegressor::build(RegressorKind::Linear, &Vec::new(), None).unwrap();
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&array![[5.0]]).unwrap();
        assert!((pred[0] - 10.0).abs() < 1e-8);
    }
}
