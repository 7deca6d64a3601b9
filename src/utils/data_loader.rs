//! Data loading utilities

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Load a CSV file with a header row into a DataFrame.
///
/// Header names are trimmed of incidental whitespace so they can be matched
/// against the fixed feature schema.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| PipelineError::DataError(format!("{}: {}", path.display(), e)))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| PipelineError::DataError(format!("{}: {}", path.display(), e)))?;

    normalize_headers(df)
}

/// Trim leading/trailing whitespace from column headers.
pub fn normalize_headers(mut df: DataFrame) -> Result<DataFrame> {
    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    df.set_column_names(trimmed)
        .map_err(|e| PipelineError::DataError(e.to_string()))?;

    Ok(df)
}
