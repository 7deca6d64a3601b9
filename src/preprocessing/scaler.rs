//! Feature scaling

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Type of scaler to apply to numeric features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalerType {
    /// Standard scaling (z-score): (x - mean) / std
    Standard,
    /// Min-max scaling: (x - min) / (max - min)
    MinMax,
    /// No scaling
    None,
}

/// Fitted parameters for a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    center: f64,
    scale: f64,
}

/// Numeric feature scaler.
///
/// Parameters are computed once at fit time and reused for every transform;
/// a zero spread is mapped to a scale of 1.0 so constant columns pass
/// through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    scaler_type: ScalerType,
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    pub fn new(scaler_type: ScalerType) -> Self {
        Self {
            scaler_type,
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Compute per-column center and scale
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.to_string()))?;

            let params = self.compute_params(column.as_materialized_series())?;
            self.params.insert(col_name.to_string(), params);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the fitted columns
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }

        let mut result = df.clone();

        for (col_name, params) in &self.params {
            if let Ok(column) = df.column(col_name) {
                let scaled = Self::scale_series(column.as_materialized_series(), params)?;
                result = result
                    .with_column(scaled)
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

    fn compute_params(&self, series: &Series) -> Result<ScalerParams> {
        let ca = series
            .cast(&DataType::Float64)
            .map_err(|e| PipelineError::DataError(e.to_string()))?;
        let ca = ca
            .f64()
            .map_err(|e| PipelineError::DataError(e.to_string()))?
            .clone();

        match self.scaler_type {
            ScalerType::Standard => {
                let mean = ca.mean().unwrap_or(0.0);
                let std = ca.std(1).unwrap_or(1.0);
                Ok(ScalerParams {
                    center: mean,
                    scale: if std == 0.0 { 1.0 } else { std },
                })
            }
            ScalerType::MinMax => {
                let min = ca.min().unwrap_or(0.0);
                let max = ca.max().unwrap_or(1.0);
                let range = max - min;
                Ok(ScalerParams {
                    center: min,
                    scale: if range == 0.0 { 1.0 } else { range },
                })
            }
            ScalerType::None => Ok(ScalerParams {
                center: 0.0,
                scale: 1.0,
            }),
        }
    }

    fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
        let ca = series
            .cast(&DataType::Float64)
            .map_err(|e| PipelineError::DataError(e.to_string()))?;
        let ca = ca
            .f64()
            .map_err(|e| PipelineError::DataError(e.to_string()))?
            .clone();

        let scaled: Float64Chunked = ca
            .into_iter()
            .map(|opt| opt.map(|v| (v - params.center) / params.scale))
            .collect();

        Ok(scaled.with_name(series.name().clone()).into_series())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler() {
        let df = DataFrame::new(vec![Column::new(
            "score".into(),
            &[1.0, 2.0, 3.0, 4.0, 5.0],
        )])
        .unwrap();

        let mut scaler = Scaler::new(ScalerType::Standard);
        let result = scaler.fit_transform(&df, &["score"]).unwrap();

        let col = result.column("score").unwrap().f64().unwrap();
        let mean: f64 = col.mean().unwrap();
        assert!(mean.abs() < 1e-10);
    }

    #[test]
    fn test_minmax_scaler() {
        let df = DataFrame::new(vec![Column::new(
            "score".into(),
            &[1.0, 2.0, 3.0, 4.0, 5.0],
        )])
        .unwrap();

        let mut scaler = Scaler::new(ScalerType::MinMax);
        let result = scaler.fit_transform(&df, &["score"]).unwrap();

        let col = result.column("score").unwrap().f64().unwrap();
        assert!((col.min().unwrap() - 0.0).abs() < 1e-10);
        assert!((col.max().unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_constant_column_passes_through() {
        let df = DataFrame::new(vec![Column::new("flat".into(), &[7.0, 7.0, 7.0])]).unwrap();

        let mut scaler = Scaler::new(ScalerType::Standard);
        let result = scaler.fit_transform(&df, &["flat"]).unwrap();

        let col = result.column("flat").unwrap().f64().unwrap();
        // std = 0 -> scale 1, so values become (7 - 7) / 1 = 0 without NaN
        assert!(col.into_iter().all(|v| v.unwrap() == 0.0));
    }

    #[test]
    fn test_transform_uses_train_statistics() {
        let train = DataFrame::new(vec![Column::new("x".into(), &[0.0, 10.0])]).unwrap();
        let test = DataFrame::new(vec![Column::new("x".into(), &[20.0])]).unwrap();

        let mut scaler = Scaler::new(ScalerType::MinMax);
        scaler.fit(&train, &["x"]).unwrap();
        let result = scaler.transform(&test).unwrap();

        let col = result.column("x").unwrap().f64().unwrap();
        // (20 - 0) / 10 = 2.0 under train min/range, not re-fit to [0, 1]
        assert!((col.get(0).unwrap() - 2.0).abs() < 1e-10);
    }
}
