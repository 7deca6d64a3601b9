//! End-to-end scenario: transform, train, and predict on the student schema

use scorecast::config::PipelineConfig;
use scorecast::inference::{PredictPipeline, StudentRecord};
use scorecast::training::ModelTrainer;
use scorecast::transformation::DataTransformation;
use std::fmt::Write as _;
use std::path::Path;

const GENDERS: [&str; 2] = ["female", "male"];
const RACES: [&str; 5] = ["group A", "group B", "group C", "group D", "group E"];
const PARENTS: [&str; 6] = [
    "some high school",
    "high school",
    "some college",
    "associate's degree",
    "bachelor's degree",
    "master's degree",
];
const LUNCHES: [&str; 2] = ["standard", "free/reduced"];
const PREPS: [&str; 2] = ["none", "completed"];

/// Deterministic student data: the math score tracks reading and writing,
/// so the catalog can clear the minimum-score gate.
fn write_student_csv(path: &Path, n_rows: usize, offset: usize) {
    let mut csv = String::from(
        "gender,race/ethnicity,parental level of education,lunch,test preparation course,reading score,writing score,math score\n",
    );
    for i in 0..n_rows {
        let k = i + offset;
        let reading = 40 + (k * 7) % 60;
        let writing = 35 + (k * 11) % 65;
        let math = (2 * reading + 3 * writing) / 5 + k % 4;
        writeln!(
            csv,
            "{},{},{},{},{},{},{},{}",
            GENDERS[k % 2],
            RACES[k % 5],
            PARENTS[k % 6],
            LUNCHES[k % 2],
            PREPS[(k / 2) % 2],
            reading,
            writing,
            math
        )
        .unwrap();
    }
    std::fs::write(path, csv).unwrap();
}

#[test]
fn test_full_pipeline_train_then_predict() {
    let dir = tempfile::tempdir().unwrap();
    let train_path = dir.path().join("train.csv");
    let test_path = dir.path().join("test.csv");
    write_student_csv(&train_path, 100, 0);
    write_student_csv(&test_path, 20, 100);

    let config = PipelineConfig::default().with_artifact_dir(dir.path().join("artifacts"));

    // Transformation: shapes per the schema
    let transformation = DataTransformation::new(config.clone());
    let transformed = transformation.run(&train_path, &test_path).unwrap();
    assert_eq!(transformed.train.nrows(), 100);
    assert_eq!(transformed.test.nrows(), 20);
    assert_eq!(transformed.train.ncols(), transformed.test.ncols());

    // Training: one entry per catalog model, all artifacts persisted
    let trainer = ModelTrainer::new(config.clone());
    let outcome = trainer.train(&transformed.train, &transformed.test).unwrap();
    assert_eq!(outcome.report.len(), 6);
    assert!(config.preprocessor_path().exists());
    assert!(config.model_path().exists());
    assert!(outcome.best_score >= config.training.min_model_score);

    // Prediction: exactly one value for one record
    let record = StudentRecord {
        gender: "female".to_string(),
        race_ethnicity: "group C".to_string(),
        parental_level_of_education: "bachelor's degree".to_string(),
        lunch: "standard".to_string(),
        test_preparation_course: "completed".to_string(),
        reading_score: 72.0,
        writing_score: 74.0,
    };
    let pipeline = PredictPipeline::new(config);
    let predictions = pipeline.predict(&record.to_dataframe().unwrap()).unwrap();

    assert_eq!(predictions.len(), 1);
    assert!(predictions[0].is_finite());
}

#[test]
fn test_prediction_is_stable_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    let train_path = dir.path().join("train.csv");
    let test_path = dir.path().join("test.csv");
    write_student_csv(&train_path, 80, 0);
    write_student_csv(&test_path, 20, 80);

    let config = PipelineConfig::default().with_artifact_dir(dir.path().join("artifacts"));
    let transformed = DataTransformation::new(config.clone())
        .run(&train_path, &test_path)
        .unwrap();
    ModelTrainer::new(config.clone())
        .train(&transformed.train, &transformed.test)
        .unwrap();

    let record = StudentRecord {
        gender: "male".to_string(),
        race_ethnicity: "group A".to_string(),
        parental_level_of_education: "some college".to_string(),
        lunch: "free/reduced".to_string(),
        test_preparation_course: "none".to_string(),
        reading_score: 55.0,
        writing_score: 60.0,
    };

    // Each call reloads the artifacts; outputs must be bit-identical
    let pipeline = PredictPipeline::new(config);
    let first = pipeline.predict_record(&record).unwrap();
    let second = pipeline.predict_record(&record).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_prediction_with_unseen_category_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let train_path = dir.path().join("train.csv");
    let test_path = dir.path().join("test.csv");
    write_student_csv(&train_path, 80, 0);
    write_student_csv(&test_path, 20, 80);

    let config = PipelineConfig::default().with_artifact_dir(dir.path().join("artifacts"));
    let transformed = DataTransformation::new(config.clone())
        .run(&train_path, &test_path)
        .unwrap();
    ModelTrainer::new(config.clone())
        .train(&transformed.train, &transformed.test)
        .unwrap();

    let record = StudentRecord {
        gender: "female".to_string(),
        race_ethnicity: "group F".to_string(), // never seen at fit time
        parental_level_of_education: "high school".to_string(),
        lunch: "standard".to_string(),
        test_preparation_course: "none".to_string(),
        reading_score: 65.0,
        writing_score: 70.0,
    };

    let pipeline = PredictPipeline::new(config);
    let prediction = pipeline.predict_record(&record).unwrap();
    assert!(prediction.is_finite());
}
