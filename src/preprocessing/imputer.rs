//! Missing value imputation

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for filling missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with the column mean (numeric only)
    Mean,
    /// Replace with the column median (numeric only)
    Median,
    /// Replace with the most frequent value
    MostFrequent,
    /// Replace with a constant value
    Constant(f64),
}

/// Per-column fill value computed at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum FillValue {
    Numeric(f64),
    Text(String),
}

/// Imputer for missing values.
///
/// Fill values are computed once from the training data and reused for every
/// later transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, FillValue>,
    is_fitted: bool,
}

impl Imputer {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Compute fill values for the given columns
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.to_string()))?;

            let fill_value = self.compute_fill_value(column.as_materialized_series())?;
            self.fill_values.insert(col_name.to_string(), fill_value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Fill missing values using the fitted fill values
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }

        let mut result = df.clone();

        for (col_name, fill_value) in &self.fill_values {
            if let Ok(col) = df.column(col_name) {
                let filled = Self::fill_series(col.as_materialized_series(), fill_value)?;
                result = result
                    .with_column(filled)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?
                    .clone();
            }
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn is_numeric_dtype(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64
        )
    }

    fn compute_fill_value(&self, series: &Series) -> Result<FillValue> {
        match &self.strategy {
            ImputeStrategy::Mean => {
                let mean = series
                    .cast(&DataType::Float64)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?
                    .mean()
                    .unwrap_or(0.0);
                Ok(FillValue::Numeric(mean))
            }
            ImputeStrategy::Median => {
                let median = series
                    .cast(&DataType::Float64)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?
                    .median()
                    .unwrap_or(0.0);
                Ok(FillValue::Numeric(median))
            }
            ImputeStrategy::MostFrequent => {
                if Self::is_numeric_dtype(series.dtype()) {
                    Ok(FillValue::Numeric(Self::mode_numeric(series)?))
                } else {
                    Ok(FillValue::Text(Self::mode_text(series)?))
                }
            }
            ImputeStrategy::Constant(val) => Ok(FillValue::Numeric(*val)),
        }
    }

    /// Most frequent numeric value. Ties break toward the smallest value so
    /// fitted artifacts are deterministic.
    fn mode_numeric(series: &Series) -> Result<f64> {
        let ca = series
            .cast(&DataType::Float64)
            .map_err(|e| PipelineError::DataError(e.to_string()))?;
        let ca = ca
            .f64()
            .map_err(|e| PipelineError::DataError(e.to_string()))?
            .clone();

        let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
        for val in ca.into_iter().flatten() {
            let entry = counts.entry(val.to_bits()).or_insert((val, 0));
            entry.1 += 1;
        }

        let mode = counts
            .into_values()
            .max_by(|a, b| {
                a.1.cmp(&b.1)
                    .then(b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal))
            })
            .map(|(val, _)| val)
            .unwrap_or(0.0);

        Ok(mode)
    }

    /// Most frequent string value. Ties break toward the lexicographically
    /// smallest value.
    fn mode_text(series: &Series) -> Result<String> {
        let ca = series
            .str()
            .map_err(|e| PipelineError::DataError(e.to_string()))?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for val in ca.into_iter().flatten() {
            *counts.entry(val.to_string()).or_insert(0) += 1;
        }

        let mode = counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(val, _)| val)
            .unwrap_or_default();

        Ok(mode)
    }

    fn fill_series(series: &Series, fill_value: &FillValue) -> Result<Series> {
        match fill_value {
            FillValue::Numeric(val) => {
                let ca = series
                    .cast(&DataType::Float64)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?;
                let ca = ca
                    .f64()
                    .map_err(|e| PipelineError::DataError(e.to_string()))?
                    .clone();

                let filled: Float64Chunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*val)))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
            FillValue::Text(val) => {
                let ca = series
                    .str()
                    .map_err(|e| PipelineError::DataError(e.to_string()))?;

                let filled: StringChunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(val.as_str()).to_string()))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_imputation() {
        let df = DataFrame::new(vec![Column::new(
            "score".into(),
            &[Some(1.0), None, Some(3.0), Some(4.0)],
        )])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::Mean);
        let result = imputer.fit_transform(&df, &["score"]).unwrap();

        let col = result.column("score").unwrap().f64().unwrap();
        // Mean of [1, 3, 4] = 8/3
        assert!((col.get(1).unwrap() - 8.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_imputation() {
        let df = DataFrame::new(vec![Column::new(
            "score".into(),
            &[Some(1.0), None, Some(3.0), Some(100.0)],
        )])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::Median);
        let result = imputer.fit_transform(&df, &["score"]).unwrap();

        let col = result.column("score").unwrap().f64().unwrap();
        assert!((col.get(1).unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_most_frequent_string() {
        let df = DataFrame::new(vec![Column::new(
            "lunch".into(),
            &[
                Some("standard"),
                Some("standard"),
                None,
                Some("free/reduced"),
            ],
        )])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::MostFrequent);
        let result = imputer.fit_transform(&df, &["lunch"]).unwrap();

        let col = result.column("lunch").unwrap().str().unwrap();
        assert_eq!(col.get(2).unwrap(), "standard");
    }

    #[test]
    fn test_mode_tie_breaks_to_smallest() {
        let df = DataFrame::new(vec![Column::new(
            "cat".into(),
            &[Some("b"), Some("a"), None],
        )])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::MostFrequent);
        let result = imputer.fit_transform(&df, &["cat"]).unwrap();

        let col = result.column("cat").unwrap().str().unwrap();
        assert_eq!(col.get(2).unwrap(), "a");
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let df = DataFrame::new(vec![Column::new("a".into(), &[1.0])]).unwrap();
        let imputer = Imputer::new(ImputeStrategy::Mean);
        assert!(matches!(
            imputer.transform(&df),
            Err(PipelineError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_missing_column_fails() {
        let df = DataFrame::new(vec![Column::new("a".into(), &[1.0])]).unwrap();
        let mut imputer = Imputer::new(ImputeStrategy::Mean);
        assert!(matches!(
            imputer.fit(&df, &["b"]),
            Err(PipelineError::FeatureNotFound(_))
        ));
    }
}
