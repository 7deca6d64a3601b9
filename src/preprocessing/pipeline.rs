//! Schema-driven preprocessing pipeline
//!
//! Composes imputation, scaling, and encoding over a fixed feature schema.
//! The pipeline is fit exactly once on training features; `transform` takes
//! `&self`, so applying it to later data can never alter the fitted state.

use crate::config::FeatureSchema;
use crate::error::{PipelineError, Result};
use crate::preprocessing::{Encoder, Imputer, PreprocessingConfig, Scaler};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fitted preprocessor for the fixed feature schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPreprocessor {
    config: PreprocessingConfig,
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric_imputer: Option<Imputer>,
    categorical_imputer: Option<Imputer>,
    scaler: Option<Scaler>,
    encoder: Option<Encoder>,
    is_fitted: bool,
}

impl DataPreprocessor {
    /// Create an unfitted preprocessor for the given schema
    pub fn new(schema: &FeatureSchema, config: PreprocessingConfig) -> Self {
        Self {
            config,
            numeric_columns: schema.numeric_features.clone(),
            categorical_columns: schema.categorical_features.clone(),
            numeric_imputer: None,
            categorical_imputer: None,
            scaler: None,
            encoder: None,
            is_fitted: false,
        }
    }

    /// Fit imputers, scaler, and encoder on the training features.
    ///
    /// Fails with `SchemaMismatch` before any component is fitted when the
    /// frame does not carry every schema column.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.check_schema(df)?;

        let df = Self::cast_numeric_to_f64(df, &self.numeric_columns)?;

        if !self.numeric_columns.is_empty() {
            let mut imputer = Imputer::new(self.config.numeric_impute_strategy.clone());
            let cols: Vec<&str> = self.numeric_columns.iter().map(|s| s.as_str()).collect();
            imputer.fit(&df, &cols).map_err(wrap_setup)?;
            self.numeric_imputer = Some(imputer);
        }

        if !self.categorical_columns.is_empty() {
            let mut imputer = Imputer::new(self.config.categorical_impute_strategy.clone());
            let cols: Vec<&str> = self.categorical_columns.iter().map(|s| s.as_str()).collect();
            imputer.fit(&df, &cols).map_err(wrap_setup)?;
            self.categorical_imputer = Some(imputer);
        }

        // Scaler and encoder are fit on imputed data, mirroring the order
        // they run in at transform time
        if !self.numeric_columns.is_empty() {
            let imputed = match &self.numeric_imputer {
                Some(imputer) => imputer.transform(&df).map_err(wrap_setup)?,
                None => df.clone(),
            };
            let mut scaler = Scaler::new(self.config.scaler_type.clone());
            let cols: Vec<&str> = self.numeric_columns.iter().map(|s| s.as_str()).collect();
            scaler.fit(&imputed, &cols).map_err(wrap_setup)?;
            self.scaler = Some(scaler);
        }

        if !self.categorical_columns.is_empty() {
            let imputed = match &self.categorical_imputer {
                Some(imputer) => imputer.transform(&df).map_err(wrap_setup)?,
                None => df.clone(),
            };
            let mut encoder = Encoder::new(self.config.encoder_type.clone());
            let cols: Vec<&str> = self.categorical_columns.iter().map(|s| s.as_str()).collect();
            encoder.fit(&imputed, &cols).map_err(wrap_setup)?;
            self.encoder = Some(encoder);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Apply the fitted transformations and return the expanded feature frame
    /// with columns in the deterministic output order.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }
        self.check_schema(df)?;

        let mut result = Self::cast_numeric_to_f64(df, &self.numeric_columns)?;

        if let Some(ref imputer) = self.numeric_imputer {
            result = imputer.transform(&result)?;
        }
        if let Some(ref imputer) = self.categorical_imputer {
            result = imputer.transform(&result)?;
        }
        if let Some(ref scaler) = self.scaler {
            result = scaler.transform(&result)?;
        }
        if let Some(ref encoder) = self.encoder {
            result = encoder.transform(&result)?;
        }

        result
            .select(self.output_columns())
            .map_err(|e| PipelineError::DataError(e.to_string()))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Output column names: scaled numeric features in schema order, then
    /// expanded categorical columns in category-first-seen order.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = self.numeric_columns.clone();
        if let Some(ref encoder) = self.encoder {
            columns.extend(encoder.output_columns());
        } else {
            columns.extend(self.categorical_columns.clone());
        }
        columns
    }

    /// Number of features the transform produces
    pub fn n_output_features(&self) -> usize {
        self.output_columns().len()
    }

    /// Extract a transformed frame into a row-major f64 matrix, columns in
    /// output order.
    pub fn to_array(&self, df: &DataFrame) -> Result<Array2<f64>> {
        columns_to_array2(df, &self.output_columns())
    }

    /// Save the fitted preprocessor as a JSON artifact
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a fitted preprocessor from a JSON artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let preprocessor: Self = serde_json::from_str(&json)?;
        Ok(preprocessor)
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    fn check_schema(&self, df: &DataFrame) -> Result<()> {
        let missing: Vec<String> = self
            .numeric_columns
            .iter()
            .chain(self.categorical_columns.iter())
            .filter(|name| df.column(name).is_err())
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::SchemaMismatch { missing })
        }
    }

    fn cast_numeric_to_f64(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        let mut result = df.clone();
        for col_name in columns {
            if let Ok(col) = df.column(col_name) {
                let casted = col
                    .cast(&DataType::Float64)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?;
                result = result
                    .with_column(casted)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?
                    .clone();
            }
        }
        Ok(result)
    }
}

/// Extract named columns from a DataFrame into a row-major `Array2<f64>`.
pub(crate) fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.clone()))?;
            let casted = column
                .cast(&DataType::Float64)
                .map_err(|e| PipelineError::DataError(e.to_string()))?;
            let values: Vec<f64> = casted
                .f64()
                .map_err(|e| PipelineError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect();
            Ok(values)
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
        col_data[c][r]
    }))
}

fn wrap_setup(err: PipelineError) -> PipelineError {
    PipelineError::TransformationError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_schema() -> FeatureSchema {
        FeatureSchema {
            numeric_features: vec!["reading score".to_string(), "writing score".to_string()],
            categorical_features: vec!["gender".to_string(), "lunch".to_string()],
            target_column: "math score".to_string(),
        }
    }

    fn test_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("reading score".into(), &[72.0, 90.0, 47.0, 64.0]),
            Column::new("writing score".into(), &[74.0, 88.0, 44.0, 70.0]),
            Column::new("gender".into(), &["female", "female", "male", "male"]),
            Column::new("lunch".into(), &["standard", "standard", "free/reduced", "standard"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_fit_transform_shape() {
        let mut preprocessor =
            DataPreprocessor::new(&test_schema(), PreprocessingConfig::default());
        let result = preprocessor.fit_transform(&test_df()).unwrap();

        // 2 numeric + 2 gender categories + 2 lunch categories
        assert_eq!(result.height(), 4);
        assert_eq!(result.width(), 6);
        assert_eq!(preprocessor.n_output_features(), 6);
    }

    #[test]
    fn test_schema_mismatch_before_fit() {
        let df = test_df().drop("lunch").unwrap();
        let mut preprocessor =
            DataPreprocessor::new(&test_schema(), PreprocessingConfig::default());

        match preprocessor.fit(&df) {
            Err(PipelineError::SchemaMismatch { missing }) => {
                assert_eq!(missing, vec!["lunch".to_string()]);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other.map(|_| ())),
        }
        assert!(!preprocessor.is_fitted());
    }

    #[test]
    fn test_transform_does_not_refit() {
        let mut preprocessor =
            DataPreprocessor::new(&test_schema(), PreprocessingConfig::default());
        preprocessor.fit(&test_df()).unwrap();

        let train_first = preprocessor.transform(&test_df()).unwrap();

        // Transforming different data in between must not change results
        let other = DataFrame::new(vec![
            Column::new("reading score".into(), &[10.0]),
            Column::new("writing score".into(), &[5.0]),
            Column::new("gender".into(), &["female"]),
            Column::new("lunch".into(), &["standard"]),
        ])
        .unwrap();
        let _ = preprocessor.transform(&other).unwrap();

        let train_second = preprocessor.transform(&test_df()).unwrap();
        let a = preprocessor.to_array(&train_first).unwrap();
        let b = preprocessor.to_array(&train_second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_save_load_roundtrip_is_bit_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preprocessor.json");

        let mut preprocessor =
            DataPreprocessor::new(&test_schema(), PreprocessingConfig::default());
        preprocessor.fit(&test_df()).unwrap();
        preprocessor.save(&path).unwrap();

        let reloaded = DataPreprocessor::load(&path).unwrap();

        let before = preprocessor
            .to_array(&preprocessor.transform(&test_df()).unwrap())
            .unwrap();
        let after = reloaded
            .to_array(&reloaded.transform(&test_df()).unwrap())
            .unwrap();

        // Bit-identical, not approximately equal
        assert_eq!(before, after);
        assert_eq!(reloaded.output_columns(), preprocessor.output_columns());
    }

    #[test]
    fn test_output_column_order() {
        let mut preprocessor =
            DataPreprocessor::new(&test_schema(), PreprocessingConfig::default());
        preprocessor.fit(&test_df()).unwrap();

        let columns = preprocessor.output_columns();
        assert_eq!(columns[0], "reading score");
        assert_eq!(columns[1], "writing score");
        assert_eq!(columns[2], "gender_female");
        assert_eq!(columns[3], "gender_male");
    }
}
