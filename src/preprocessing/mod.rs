//! Data preprocessing module
//!
//! Provides the transformation pipeline applied before training and
//! prediction:
//! - Missing value imputation (mean / median / most frequent / constant)
//! - Feature scaling (StandardScaler, MinMaxScaler)
//! - Categorical encoding (one-hot with unseen-category tolerance, label)

mod config;
mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use config::PreprocessingConfig;
pub use encoder::{Encoder, EncoderType};
pub use imputer::{ImputeStrategy, Imputer};
pub use pipeline::DataPreprocessor;
pub use scaler::{Scaler, ScalerType};
