//! Model training module
//!
//! Provides the fixed regression model catalog, grid-searched
//! hyperparameter selection, and the evaluation loop that picks the best
//! model by held-out R².

mod config;
pub mod catalog;
pub mod cross_validation;
pub mod decision_tree;
pub mod grid_search;
pub mod knn;
pub mod linear_models;
pub mod metrics;
mod trainer;
pub mod random_forest;

pub use catalog::{default_catalog, CatalogEntry, RegressorKind, TrainedRegressor};
pub use config::TrainingConfig;
pub use cross_validation::KFold;
pub use grid_search::{GridSearch, ParamGrid, ParamValue};
pub use metrics::{r2_score, RegressionMetrics};
pub use trainer::{EvaluationReport, ModelScore, ModelTrainer, SelectedModel, TrainingOutcome};
