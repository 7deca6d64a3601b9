//! Transformation runner
//!
//! Turns the raw train/test CSV pair into model-ready matrices: loads both
//! tables, fits the preprocessor on train features only, applies it to both,
//! reattaches the target as the last column, and persists the fitted
//! preprocessor artifact.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::preprocessing::DataPreprocessor;
use crate::utils::load_csv;
use ndarray::{concatenate, Array1, Array2, Axis};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output of a transformation run: features plus target as the last column
#[derive(Debug)]
pub struct TransformedData {
    pub train: Array2<f64>,
    pub test: Array2<f64>,
    pub preprocessor_path: PathBuf,
}

/// Runs the fit-on-train / apply-to-test transformation
pub struct DataTransformation {
    config: PipelineConfig,
}

impl DataTransformation {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Transform the train/test pair and persist the fitted preprocessor.
    pub fn run(
        &self,
        train_path: impl AsRef<Path>,
        test_path: impl AsRef<Path>,
    ) -> Result<TransformedData> {
        let train_path = train_path.as_ref();
        let test_path = test_path.as_ref();

        let train_df = load_csv(train_path)?;
        let test_df = load_csv(test_path)?;
        info!(
            train_rows = train_df.height(),
            test_rows = test_df.height(),
            "Loaded train and test tables"
        );

        let target = &self.config.schema.target_column;
        if train_df.column(target).is_err() {
            return Err(PipelineError::MissingTargetColumn(format!(
                "{} (in {})",
                target,
                train_path.display()
            )));
        }
        if test_df.column(target).is_err() {
            return Err(PipelineError::MissingTargetColumn(format!(
                "{} (in {})",
                target,
                test_path.display()
            )));
        }

        let (train_features, train_target) = split_features_target(&train_df, target)?;
        let (test_features, test_target) = split_features_target(&test_df, target)?;

        let mut preprocessor =
            DataPreprocessor::new(&self.config.schema, self.config.preprocessing.clone());
        preprocessor.fit(&train_features)?;
        info!(
            n_features = preprocessor.n_output_features(),
            "Fitted preprocessor on train features"
        );

        let train_transformed = preprocessor.transform(&train_features)?;
        let test_transformed = preprocessor.transform(&test_features)?;

        let train = append_target(
            preprocessor.to_array(&train_transformed)?,
            &train_target,
        )?;
        let test = append_target(preprocessor.to_array(&test_transformed)?, &test_target)?;

        std::fs::create_dir_all(&self.config.artifact_dir).map_err(|e| {
            PipelineError::TransformationError(format!(
                "creating {}: {}",
                self.config.artifact_dir.display(),
                e
            ))
        })?;
        let preprocessor_path = self.config.preprocessor_path();
        preprocessor.save(&preprocessor_path)?;
        info!(path = %preprocessor_path.display(), "Saved preprocessor artifact");

        Ok(TransformedData {
            train,
            test,
            preprocessor_path,
        })
    }
}

/// Split a table into its feature frame and target values
fn split_features_target(df: &DataFrame, target: &str) -> Result<(DataFrame, Array1<f64>)> {
    let features = df
        .drop(target)
        .map_err(|e| PipelineError::DataError(e.to_string()))?;

    let target_values: Array1<f64> = df
        .column(target)
        .map_err(|_| PipelineError::MissingTargetColumn(target.to_string()))?
        .cast(&DataType::Float64)
        .map_err(|e| PipelineError::DataError(e.to_string()))?
        .f64()
        .map_err(|e| PipelineError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();

    Ok((features, target_values))
}

/// Concatenate the target as the last column of the feature matrix
fn append_target(features: Array2<f64>, target: &Array1<f64>) -> Result<Array2<f64>> {
    if features.nrows() != target.len() {
        return Err(PipelineError::ShapeError {
            expected: format!("{} target rows", features.nrows()),
            actual: format!("{} target rows", target.len()),
        });
    }

    let target_col = target.view().insert_axis(Axis(1));
    Ok(concatenate(Axis(1), &[features.view(), target_col])?)
}
