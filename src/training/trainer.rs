//! Model trainer and evaluation loop

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::training::catalog::{default_catalog, TrainedRegressor};
use crate::training::grid_search::GridSearch;
use crate::training::metrics::r2_score;
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Held-out scores for one catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelScore {
    pub name: String,
    pub train_r2: f64,
    pub test_r2: f64,
}

/// Per-model scores in catalog order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub scores: Vec<ModelScore>,
}

impl EvaluationReport {
    /// The entry with the maximum test score; ties break toward catalog
    /// order (first maximum wins).
    pub fn best(&self) -> Option<&ModelScore> {
        let mut best: Option<&ModelScore> = None;
        for score in &self.scores {
            if best.map_or(true, |b| score.test_r2 > b.test_r2) {
                best = Some(score);
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// The persisted winning model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedModel {
    pub name: String,
    pub test_r2: f64,
    pub model: TrainedRegressor,
}

impl SelectedModel {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&json)?;
        Ok(model)
    }
}

/// Result of a full training run
#[derive(Debug)]
pub struct TrainingOutcome {
    pub report: EvaluationReport,
    pub best_name: String,
    pub best_score: f64,
    pub model_path: PathBuf,
}

/// Runs the evaluation loop over the fixed model catalog and persists the
/// winner.
pub struct ModelTrainer {
    config: PipelineConfig,
}

impl ModelTrainer {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Train and evaluate every catalog model on the transformed arrays
    /// (features with the target as the last column), then persist the best.
    pub fn train(&self, train: &Array2<f64>, test: &Array2<f64>) -> Result<TrainingOutcome> {
        let (x_train, y_train) = split_features_target(train)?;
        let (x_test, y_test) = split_features_target(test)?;

        let training = &self.config.training;
        let mut report = EvaluationReport::default();
        let mut best: Option<(f64, SelectedModel)> = None;

        for entry in default_catalog() {
            let params = if entry.grid.is_empty() {
                Vec::new()
            } else {
                let search = GridSearch::new(training.cv_folds, training.random_seed);
                let result = search
                    .search(entry.kind, &entry.grid, &x_train, &y_train)
                    .map_err(|e| {
                        PipelineError::TrainingError(format!(
                            "grid search for {}: {}",
                            entry.name, e
                        ))
                    })?;
                info!(
                    model = %entry.name,
                    cv_r2 = result.best_score,
                    params = %format_params(&result.best_params),
                    "Grid search complete"
                );
                result.best_params
            };

            let mut model =
                TrainedRegressor::build(entry.kind, &params, training.random_seed)?;
            model.fit(&x_train, &y_train).map_err(|e| {
                PipelineError::TrainingError(format!("fitting {}: {}", entry.name, e))
            })?;

            let train_r2 = r2_score(&y_train, &model.predict(&x_train)?);
            let test_r2 = r2_score(&y_test, &model.predict(&x_test)?);
            info!(model = %entry.name, train_r2, test_r2, "Evaluated model");

            // Strictly-greater comparison keeps the first maximum on ties
            if best.as_ref().map_or(true, |(score, _)| test_r2 > *score) {
                best = Some((
                    test_r2,
                    SelectedModel {
                        name: entry.name.clone(),
                        test_r2,
                        model: model.clone(),
                    },
                ));
            }

            report.scores.push(ModelScore {
                name: entry.name,
                train_r2,
                test_r2,
            });
        }

        let (best_score, selected) = best.ok_or_else(|| {
            PipelineError::TrainingError("model catalog is empty".to_string())
        })?;

        if best_score < training.min_model_score {
            return Err(PipelineError::TrainingError(format!(
                "no sufficiently accurate model found: best test R² {:.4} is below {}",
                best_score, training.min_model_score
            )));
        }

        std::fs::create_dir_all(&self.config.artifact_dir)?;
        let model_path = self.config.model_path();
        selected.save(&model_path)?;
        std::fs::write(
            self.config.report_path(),
            serde_json::to_string_pretty(&report)?,
        )?;
        info!(
            model = %selected.name,
            test_r2 = best_score,
            path = %model_path.display(),
            "Saved selected model"
        );

        Ok(TrainingOutcome {
            report,
            best_name: selected.name,
            best_score,
            model_path,
        })
    }
}

/// Split a combined array into features and trailing target column
fn split_features_target(data: &Array2<f64>) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_cols = data.ncols();
    if n_cols < 2 {
        return Err(PipelineError::ShapeError {
            expected: "at least 2 columns (features + target)".to_string(),
            actual: format!("{} columns", n_cols),
        });
    }

    let x = data.slice(s![.., ..n_cols - 1]).to_owned();
    let y = data.column(n_cols - 1).to_owned();
    Ok((x, y))
}

fn format_params(params: &crate::training::grid_search::ParamSet) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}
