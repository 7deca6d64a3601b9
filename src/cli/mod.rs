//! Command-line interface
//!
//! Training, one-off prediction, and the web server behind one binary.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::inference::{PredictPipeline, StudentRecord};
use crate::server::{run_server, ServerConfig};
use crate::training::ModelTrainer;
use crate::transformation::DataTransformation;

#[derive(Parser)]
#[command(name = "scorecast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Student performance prediction pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform the train/test pair and train the model catalog
    Train {
        /// Training data CSV
        #[arg(long)]
        train_data: PathBuf,

        /// Test data CSV
        #[arg(long)]
        test_data: PathBuf,

        /// Directory for the preprocessor and model artifacts
        #[arg(long, default_value = "artifacts")]
        artifact_dir: PathBuf,
    },

    /// Predict the math score for one student
    Predict {
        #[arg(long)]
        gender: String,

        #[arg(long)]
        race_ethnicity: String,

        #[arg(long)]
        parental_level_of_education: String,

        #[arg(long)]
        lunch: String,

        #[arg(long)]
        test_preparation_course: String,

        #[arg(long)]
        reading_score: f64,

        #[arg(long)]
        writing_score: f64,

        /// Directory holding the trained artifacts
        #[arg(long, default_value = "artifacts")]
        artifact_dir: PathBuf,
    },

    /// Serve the prediction form UI
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,

        /// Directory holding the trained artifacts
        #[arg(long, default_value = "artifacts")]
        artifact_dir: PathBuf,
    },
}

/// Run transformation and training, then print the score report
pub fn cmd_train(
    train_data: &PathBuf,
    test_data: &PathBuf,
    artifact_dir: &PathBuf,
) -> anyhow::Result<()> {
    let config = PipelineConfig::default().with_artifact_dir(artifact_dir);

    let transformation = DataTransformation::new(config.clone());
    let transformed = transformation.run(train_data, test_data)?;
    println!(
        "{} train {}x{}, test {}x{}",
        "Transformed".green().bold(),
        transformed.train.nrows(),
        transformed.train.ncols(),
        transformed.test.nrows(),
        transformed.test.ncols(),
    );

    let trainer = ModelTrainer::new(config);
    let outcome = trainer.train(&transformed.train, &transformed.test)?;

    println!();
    println!("  {:<24} {:>9} {:>9}", "model".bold(), "train R²", "test R²");
    for score in &outcome.report.scores {
        println!(
            "  {:<24} {:>9.4} {:>9.4}",
            score.name, score.train_r2, score.test_r2
        );
    }
    println!();
    println!(
        "{} {} (test R² {:.4}) -> {}",
        "Selected".green().bold(),
        outcome.best_name.bold(),
        outcome.best_score,
        outcome.model_path.display(),
    );

    Ok(())
}

/// Predict one score from the persisted artifacts
pub fn cmd_predict(record: StudentRecord, artifact_dir: &PathBuf) -> anyhow::Result<()> {
    let config = PipelineConfig::default().with_artifact_dir(artifact_dir);
    let pipeline = PredictPipeline::new(config);
    let prediction = pipeline.predict_record(&record)?;

    println!(
        "{} {:.2}",
        "Predicted math score:".green().bold(),
        prediction
    );
    Ok(())
}

/// Start the web UI
pub async fn cmd_serve(host: &str, port: u16, artifact_dir: &PathBuf) -> anyhow::Result<()> {
    let server_config = ServerConfig {
        host: host.to_string(),
        port,
    };
    let pipeline = PipelineConfig::default().with_artifact_dir(artifact_dir);
    run_server(server_config, pipeline).await
}
