//! HTTP request handlers

use std::sync::Arc;
use axum::{extract::State, response::Html, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::inference::{PredictPipeline, StudentRecord};

use super::error::{Result, ServerError};
use super::state::AppState;

/// The seven form fields of a prediction request
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub gender: String,
    pub race_ethnicity: String,
    pub parental_level_of_education: String,
    pub lunch: String,
    pub test_preparation_course: String,
    pub reading_score: f64,
    pub writing_score: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: f64,
}

/// Run one prediction against the persisted artifacts
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>> {
    for (name, value) in [
        ("reading score", request.reading_score),
        ("writing score", request.writing_score),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(ServerError::BadRequest(format!(
                "{} must be between 0 and 100, got {}",
                name, value
            )));
        }
    }

    let record = StudentRecord {
        gender: request.gender,
        race_ethnicity: request.race_ethnicity,
        parental_level_of_education: request.parental_level_of_education,
        lunch: request.lunch,
        test_preparation_course: request.test_preparation_course,
        reading_score: request.reading_score,
        writing_score: request.writing_score,
    };

    let pipeline = PredictPipeline::new(state.pipeline.clone());
    let prediction = pipeline.predict_record(&record)?;

    info!(prediction, "Served prediction");
    Ok(Json(PredictResponse {
        success: true,
        prediction,
    }))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve the embedded prediction form
pub async fn serve_index() -> Html<&'static str> {
    Html(EMBEDDED_INDEX_HTML)
}

const EMBEDDED_INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Student Performance Predictor</title>
<style>
  body { font-family: system-ui, sans-serif; background: #f5f4fb; color: #333; margin: 0; }
  header { background: #4527A0; color: white; padding: 18px 28px; }
  header h1 { margin: 0; font-size: 1.5rem; }
  header p { margin: 4px 0 0; color: #d1c4e9; font-size: 0.95rem; }
  main { display: flex; flex-wrap: wrap; gap: 24px; padding: 24px 28px; }
  .card { background: white; border-radius: 10px; padding: 20px 24px; box-shadow: 0 1px 4px rgba(0,0,0,0.1); }
  form.card { flex: 1 1 320px; max-width: 420px; }
  #result-card { flex: 1 1 320px; max-width: 420px; text-align: center; }
  label { display: block; margin: 12px 0 4px; font-weight: 600; font-size: 0.9rem; }
  select { width: 100%; padding: 8px; border: 1px solid #ccc; border-radius: 6px; }
  input[type=range] { width: 100%; }
  .slider-value { font-weight: 700; color: #5E35B1; }
  button { margin-top: 18px; width: 100%; background: #5E35B1; color: white; font-weight: 600;
           border: none; border-radius: 30px; padding: 12px; cursor: pointer; font-size: 1rem; }
  button:hover { background: #4527A0; }
  .prediction-value { font-size: 3rem; font-weight: 700; color: #3949AB; margin: 8px 0; }
  #error { color: #c62828; font-weight: 600; margin-top: 12px; display: none; }
  #placeholder { color: #888; }
</style>
</head>
<body>
<header>
  <h1>Student Performance Predictor</h1>
  <p>Predict math scores based on student attributes</p>
</header>
<main>
  <form class="card" id="predict-form">
    <label for="gender">Gender</label>
    <select id="gender">
      <option>male</option>
      <option>female</option>
    </select>

    <label for="race_ethnicity">Race/Ethnicity</label>
    <select id="race_ethnicity">
      <option>group A</option>
      <option>group B</option>
      <option>group C</option>
      <option>group D</option>
      <option>group E</option>
    </select>

    <label for="parental_level_of_education">Parental Level of Education</label>
    <select id="parental_level_of_education">
      <option>some high school</option>
      <option>high school</option>
      <option>some college</option>
      <option>associate's degree</option>
      <option>bachelor's degree</option>
      <option>master's degree</option>
    </select>

    <label for="lunch">Lunch Type</label>
    <select id="lunch">
      <option>standard</option>
      <option>free/reduced</option>
    </select>

    <label for="test_preparation_course">Test Preparation Course</label>
    <select id="test_preparation_course">
      <option>none</option>
      <option>completed</option>
    </select>

    <label for="reading_score">Reading Score: <span class="slider-value" id="reading-value">50</span></label>
    <input type="range" id="reading_score" min="0" max="100" step="1" value="50">

    <label for="writing_score">Writing Score: <span class="slider-value" id="writing-value">50</span></label>
    <input type="range" id="writing_score" min="0" max="100" step="1" value="50">

    <button type="submit">Predict Math Score</button>
    <div id="error"></div>
  </form>

  <div class="card" id="result-card">
    <h2>Predicted Math Score</h2>
    <p id="placeholder">Fill in the student details and submit to see a prediction.</p>
    <div id="result" style="display:none">
      <div class="prediction-value" id="prediction"></div>
      <svg viewBox="0 0 200 115" width="280" aria-label="score gauge">
        <path d="M 20 100 A 80 80 0 0 1 100 20" stroke="#FFCDD2" stroke-width="18" fill="none"/>
        <path d="M 100 20 A 80 80 0 0 1 156.6 43.4" stroke="#FFECB3" stroke-width="18" fill="none"/>
        <path d="M 156.6 43.4 A 80 80 0 0 1 180 100" stroke="#C8E6C9" stroke-width="18" fill="none"/>
        <line id="needle" x1="100" y1="100" x2="100" y2="32" stroke="#5E35B1" stroke-width="4"
              transform="rotate(-90 100 100)"/>
        <circle cx="100" cy="100" r="6" fill="#5E35B1"/>
      </svg>
    </div>
  </div>
</main>
<script>
  const form = document.getElementById('predict-form');
  const errorBox = document.getElementById('error');

  for (const name of ['reading', 'writing']) {
    const slider = document.getElementById(name + '_score');
    const label = document.getElementById(name + '-value');
    slider.addEventListener('input', () => { label.textContent = slider.value; });
  }

  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    errorBox.style.display = 'none';

    const body = {
      gender: document.getElementById('gender').value,
      race_ethnicity: document.getElementById('race_ethnicity').value,
      parental_level_of_education: document.getElementById('parental_level_of_education').value,
      lunch: document.getElementById('lunch').value,
      test_preparation_course: document.getElementById('test_preparation_course').value,
      reading_score: Number(document.getElementById('reading_score').value),
      writing_score: Number(document.getElementById('writing_score').value),
    };

    try {
      const response = await fetch('/api/predict', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      const data = await response.json();
      if (!response.ok || data.error) {
        throw new Error(data.message || 'Prediction failed');
      }

      const score = data.prediction;
      document.getElementById('placeholder').style.display = 'none';
      document.getElementById('result').style.display = 'block';
      document.getElementById('prediction').textContent = score.toFixed(2);
      const clamped = Math.max(0, Math.min(100, score));
      const angle = clamped / 100 * 180 - 90;
      document.getElementById('needle').setAttribute('transform', `rotate(${angle} 100 100)`);
    } catch (err) {
      document.getElementById('result').style.display = 'none';
      document.getElementById('placeholder').style.display = 'block';
      errorBox.textContent = err.message;
      errorBox.style.display = 'block';
    }
  });
</script>
</body>
</html>
"##;
