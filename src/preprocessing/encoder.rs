//! Categorical encoding

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Type of encoder to apply to categorical features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncoderType {
    /// One indicator column per category observed at fit time.
    /// Unseen categories produce an all-zero indicator block.
    OneHot,
    /// Ordinal label encoding
    Label,
}

/// Categorical encoder.
///
/// Categories are recorded per column in first-seen order so the expanded
/// column layout is identical for every transform of the same fitted encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encoder {
    encoder_type: EncoderType,
    /// Fitted columns in fit order
    columns: Vec<String>,
    /// Column name -> categories in first-seen order
    categories: HashMap<String, Vec<String>>,
    is_fitted: bool,
}

impl Encoder {
    pub fn new(encoder_type: EncoderType) -> Self {
        Self {
            encoder_type,
            columns: Vec::new(),
            categories: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Record the observed categories for the given columns
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.columns.clear();
        self.categories.clear();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.to_string()))?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| PipelineError::DataError(e.to_string()))?;

            let mut seen = Vec::new();
            for val in ca.into_iter().flatten() {
                if !seen.iter().any(|s: &String| s == val) {
                    seen.push(val.to_string());
                }
            }

            self.columns.push(col_name.to_string());
            self.categories.insert(col_name.to_string(), seen);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Encode the fitted columns
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }

        match self.encoder_type {
            EncoderType::OneHot => self.transform_onehot(df),
            EncoderType::Label => self.transform_label(df),
        }
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Names of the columns this encoder produces, in output order
    pub fn output_columns(&self) -> Vec<String> {
        match self.encoder_type {
            EncoderType::OneHot => self
                .columns
                .iter()
                .flat_map(|col| {
                    self.categories[col]
                        .iter()
                        .map(move |cat| format!("{}_{}", col, cat))
                })
                .collect(),
            EncoderType::Label => self.columns.clone(),
        }
    }

    fn transform_onehot(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();

        for col_name in &self.columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.clone()))?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| PipelineError::DataError(e.to_string()))?;

            for category in &self.categories[col_name] {
                let indicator_name = format!("{}_{}", col_name, category);
                let values: Vec<f64> = ca
                    .into_iter()
                    .map(|v| if v == Some(category.as_str()) { 1.0 } else { 0.0 })
                    .collect();

                let indicator = Series::new(indicator_name.into(), values);
                result = result
                    .with_column(indicator)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?
                    .clone();
            }

            result = result
                .drop(col_name)
                .map_err(|e| PipelineError::DataError(e.to_string()))?;
        }

        Ok(result)
    }

    fn transform_label(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();

        for col_name in &self.columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.clone()))?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| PipelineError::DataError(e.to_string()))?;

            let cats = &self.categories[col_name];
            let values: Vec<Option<i64>> = ca
                .into_iter()
                .map(|v| v.and_then(|s| cats.iter().position(|c| c == s).map(|i| i as i64)))
                .collect();

            let encoded = Series::new(col_name.clone().into(), values);
            result = result
                .with_column(encoded)
                .map_err(|e| PipelineError::DataError(e.to_string()))?
                .clone();
        }

        Ok(result)
    }
}
