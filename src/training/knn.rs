//! K-nearest neighbors regressor

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Distance metric between samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean distance (L2)
    Euclidean,
    /// Manhattan distance (L1)
    Manhattan,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        Self::Euclidean
    }
}

/// K-nearest neighbors regressor: stores the training set and predicts the
/// mean target of the k closest samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnRegressor {
    pub n_neighbors: usize,
    pub metric: DistanceMetric,
    x_train: Option<Array2<f64>>,
    y_train: Option<Array1<f64>>,
}

impl Default for KnnRegressor {
    fn default() -> Self {
        Self::new(5)
    }
}

impl KnnRegressor {
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            metric: DistanceMetric::Euclidean,
            x_train: None,
            y_train: None,
        }
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Fit stores the training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        if x.nrows() != y.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }
        if x.nrows() < self.n_neighbors {
            return Err(PipelineError::TrainingError(format!(
                "need at least {} samples for {} neighbors, got {}",
                self.n_neighbors,
                self.n_neighbors,
                x.nrows()
            )));
        }

        self.x_train = Some(x.clone());
        self.y_train = Some(y.clone());
        Ok(self)
    }

    /// Predict the mean target of the k nearest neighbors, parallelized over
    /// query rows.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let x_train = self.x_train.as_ref().ok_or(PipelineError::ModelNotFitted)?;
        let y_train = self.y_train.as_ref().ok_or(PipelineError::ModelNotFitted)?;

        let predictions: Vec<f64> = (0..x.nrows())
            .into_par_iter()
            .map(|i| {
                let row: Vec<f64> = x.row(i).to_vec();
                let neighbors =
                    find_k_nearest(&row, x_train, y_train, self.n_neighbors, self.metric);
                neighbors.iter().map(|(_, label)| label).sum::<f64>()
                    / neighbors.len().max(1) as f64
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }
}

/// Max-heap entry keeping the k smallest distances
#[derive(PartialEq)]
struct DistLabel(f64, f64);

impl Eq for DistLabel {}
impl PartialOrd for DistLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}
impl Ord for DistLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

fn compute_distance(a: &[f64], b: &[f64], metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Euclidean => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt(),
        DistanceMetric::Manhattan => a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum(),
    }
}

/// Partial sort via max-heap: O(n log k) to find the k nearest samples
fn find_k_nearest(
    query: &[f64],
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    k: usize,
    metric: DistanceMetric,
) -> Vec<(f64, f64)> {
    let mut heap: BinaryHeap<DistLabel> = BinaryHeap::with_capacity(k + 1);

    for i in 0..x_train.nrows() {
        let row: Vec<f64> = x_train.row(i).to_vec();
        let dist = compute_distance(query, &row, metric);
        heap.push(DistLabel(dist, y_train[i]));
        if heap.len() > k {
            heap.pop();
        }
    }

    heap.into_iter().map(|DistLabel(d, l)| (d, l)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_neighbor_returns_closest_label() {
        let x = array![[0.0], [10.0], [20.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut model = KnnRegressor::new(1);
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&array![[9.0]]).unwrap();
        assert_eq!(pred[0], 2.0);
    }

    #[test]
    fn test_mean_of_k_neighbors() {
        let x = array![[0.0], [1.0], [100.0]];
        let y = array![2.0, 4.0, 50.0];

        let mut model = KnnRegressor::new(2);
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&array![[0.5]]).unwrap();
        assert_eq!(pred[0], 3.0);
    }

    #[test]
    fn test_manhattan_metric() {
        let x = array![[0.0, 0.0], [3.0, 4.0]];
        let y = array![1.0, 9.0];

        let mut model = KnnRegressor::new(1).with_metric(DistanceMetric::Manhattan);
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&array![[3.0, 3.0]]).unwrap();
        assert_eq!(pred[0], 9.0);
    }

    #[test]
    fn test_too_few_samples_fails() {
        let x = array![[0.0], [1.0]];
        let y = array![1.0, 2.0];
        let mut model = KnnRegressor::new(5);
        assert!(model.fit(&x, &y).is_err());
    }
}
