//! Prediction pipeline
//!
//! Loads the two persisted artifacts (fitted preprocessor and selected
//! model), transforms a single incoming record, and returns the predicted
//! score.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::preprocessing::DataPreprocessor;
use crate::training::SelectedModel;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A single student record shaped like the feature schema (no target)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub gender: String,
    pub race_ethnicity: String,
    pub parental_level_of_education: String,
    pub lunch: String,
    pub test_preparation_course: String,
    pub reading_score: f64,
    pub writing_score: f64,
}

impl StudentRecord {
    /// Build a one-row frame with the schema's column names
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        DataFrame::new(vec![
            Column::new("gender".into(), &[self.gender.as_str()]),
            Column::new("race/ethnicity".into(), &[self.race_ethnicity.as_str()]),
            Column::new(
                "parental level of education".into(),
                &[self.parental_level_of_education.as_str()],
            ),
            Column::new("lunch".into(), &[self.lunch.as_str()]),
            Column::new(
                "test preparation course".into(),
                &[self.test_preparation_course.as_str()],
            ),
            Column::new("reading score".into(), &[self.reading_score]),
            Column::new("writing score".into(), &[self.writing_score]),
        ])
        .map_err(|e| PipelineError::DataError(e.to_string()))
    }
}

/// End-to-end prediction over the persisted artifacts
pub struct PredictPipeline {
    config: PipelineConfig,
}

impl PredictPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Predict target values for a feature table shaped like the schema.
    /// Returns one value per input row.
    pub fn predict(&self, df: &DataFrame) -> Result<Vec<f64>> {
        let preprocessor = load_artifact(self.config.preprocessor_path(), |path| {
            DataPreprocessor::load(path)
        })?;
        let selected = load_artifact(self.config.model_path(), |path| {
            SelectedModel::load(path)
        })?;

        let transformed = preprocessor
            .transform(df)
            .map_err(|e| PipelineError::PredictionError(format!("transforming record: {}", e)))?;
        let x = preprocessor.to_array(&transformed)?;

        let predictions = selected
            .model
            .predict(&x)
            .map_err(|e| PipelineError::PredictionError(format!("predicting: {}", e)))?;

        info!(model = %selected.name, n = predictions.len(), "Prediction complete");
        Ok(predictions.to_vec())
    }

    /// Predict the score for one typed record
    pub fn predict_record(&self, record: &StudentRecord) -> Result<f64> {
        let df = record.to_dataframe()?;
        let predictions = self.predict(&df)?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| PipelineError::PredictionError("empty prediction output".to_string()))
    }
}

/// Load an artifact, attaching its path to any failure
fn load_artifact<T>(
    path: std::path::PathBuf,
    loader: impl FnOnce(&Path) -> Result<T>,
) -> Result<T> {
    loader(&path)
        .map_err(|e| PipelineError::PredictionError(format!("loading {}: {}", path.display(), e)))
}
