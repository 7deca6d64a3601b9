//! Shared utilities

pub mod data_loader;

pub use data_loader::{load_csv, normalize_headers};
