//! Pipeline configuration
//!
//! All fixed artifact paths and column-name lists live in explicit
//! configuration structures passed into each component, so tests can run
//! against isolated directories and synthetic schemas.

use crate::preprocessing::PreprocessingConfig;
use crate::training::TrainingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed feature schema: which columns are numeric, which are categorical,
/// and which single column is the prediction target. Nothing is inferred
/// from the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub target_column: String,
}

impl FeatureSchema {
    /// Schema of the student performance dataset.
    pub fn student_performance() -> Self {
        Self {
            numeric_features: vec!["reading score".to_string(), "writing score".to_string()],
            categorical_features: vec![
                "gender".to_string(),
                "race/ethnicity".to_string(),
                "parental level of education".to_string(),
                "lunch".to_string(),
                "test preparation course".to_string(),
            ],
            target_column: "math score".to_string(),
        }
    }

    /// All feature column names (numeric first, then categorical).
    pub fn feature_columns(&self) -> Vec<String> {
        self.numeric_features
            .iter()
            .chain(self.categorical_features.iter())
            .cloned()
            .collect()
    }
}

/// Top-level configuration shared by the transformation runner, the trainer,
/// and the prediction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub schema: FeatureSchema,
    /// Directory where the fitted preprocessor and the selected model live
    pub artifact_dir: PathBuf,
    pub preprocessing: PreprocessingConfig,
    pub training: TrainingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema: FeatureSchema::student_performance(),
            artifact_dir: PathBuf::from("artifacts"),
            preprocessing: PreprocessingConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to redirect artifacts (test isolation)
    pub fn with_artifact_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.artifact_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Builder method to replace the feature schema
    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Path of the persisted fitted preprocessor
    pub fn preprocessor_path(&self) -> PathBuf {
        self.artifact_dir.join("preprocessor.json")
    }

    /// Path of the persisted selected model
    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join("model.json")
    }

    /// Path of the persisted evaluation report
    pub fn report_path(&self) -> PathBuf {
        self.artifact_dir.join("report.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_schema() {
        let schema = FeatureSchema::student_performance();
        assert_eq!(schema.numeric_features.len(), 2);
        assert_eq!(schema.categorical_features.len(), 5);
        assert_eq!(schema.target_column, "math score");
        assert_eq!(schema.feature_columns().len(), 7);
    }

    #[test]
    fn test_artifact_paths() {
        let config = PipelineConfig::default().with_artifact_dir("/tmp/arts");
        assert_eq!(
            config.preprocessor_path(),
            PathBuf::from("/tmp/arts/preprocessor.json")
        );
        assert_eq!(config.model_path(), PathBuf::from("/tmp/arts/model.json"));
    }
}
