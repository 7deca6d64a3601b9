//! Scorecast - student performance prediction pipeline
//!
//! An end-to-end tabular ML pipeline:
//! - CSV preprocessing: imputation, scaling, one-hot encoding
//! - Model selection over a fixed regression catalog with grid search
//! - JSON artifact persistence for the fitted preprocessor and best model
//! - Single-record predictions through a web form UI and CLI
//!
//! # Modules
//!
//! - [`preprocessing`] - imputers, scaler, encoder, and the fitted pipeline
//! - [`transformation`] - the fit-on-train / apply-to-test runner
//! - [`training`] - model catalog, grid search, evaluation loop
//! - [`inference`] - prediction over the persisted artifacts
//! - [`server`] - the web form UI and REST endpoint
//! - [`cli`] - the command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod preprocessing;
pub mod server;
pub mod training;
pub mod transformation;
pub mod utils;

pub use error::{PipelineError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{FeatureSchema, PipelineConfig};
    pub use crate::error::{PipelineError, Result};
    pub use crate::inference::{PredictPipeline, StudentRecord};
    pub use crate::preprocessing::{DataPreprocessor, PreprocessingConfig};
    pub use crate::training::{
        default_catalog, EvaluationReport, ModelTrainer, TrainingConfig,
    };
    pub use crate::transformation::{DataTransformation, TransformedData};
}
