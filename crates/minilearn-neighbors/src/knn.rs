use minilearn_core::{majority_label, Matrix, MlError, MlResult};
use minilearn_metrics::TaskType;
use minilearn_model::{Lifecycle, Model};
use serde::{Deserialize, Serialize};

/// Hyperparameters of [`KNearestNeighbors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnParams {
    /// Number of neighbours that vote.
    pub k: usize,
}

impl Default for KnnParams {
    fn default() -> Self {
        KnnParams { k: 7 }
    }
}

impl KnnParams {
    pub fn validate(&self) -> MlResult<()> {
        if self.k == 0 {
            return Err(MlError::invalid_hyperparameter("k", "must be at least 1"));
        }
        Ok(())
    }
}

/// Euclidean distance between two points of equal dimension.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// K-Nearest Neighbors classifier with Euclidean distance and majority vote.
///
/// `fit` keeps its own copy of the training set. Distance ties keep training
/// order and vote ties go to the lowest label.
#[derive(Debug, Clone)]
pub struct KNearestNeighbors {
    params: KnnParams,
    name: String,
    x_train: Option<Matrix>,
    y_train: Vec<f64>,
    lifecycle: Lifecycle,
}

impl KNearestNeighbors {
    pub fn new(k: usize) -> MlResult<Self> {
        Self::from_params(KnnParams { k })
    }

    pub fn from_params(params: KnnParams) -> MlResult<Self> {
        params.validate()?;
        Ok(KNearestNeighbors {
            name: format!("k-Nearest Neighbors (k={})", params.k),
            params,
            x_train: None,
            y_train: Vec::new(),
            lifecycle: Lifecycle::new(),
        })
    }

    pub fn k(&self) -> usize {
        self.params.k
    }

    fn predict_one(&self, x_train: &Matrix, query: &[f64]) -> f64 {
        let mut dists: Vec<(f64, usize)> = x_train
            .iter_rows()
            .enumerate()
            .map(|(i, row)| (euclidean(query, row), i))
            .collect();
        // Stable: equal distances keep training order.
        dists.sort_by(|a, b| a.0.total_cmp(&b.0));

        let k = self.params.k.min(dists.len());
        majority_label(dists[..k].iter().map(|&(_, i)| self.y_train[i])).unwrap_or(0.0)
    }
}

impl Default for KNearestNeighbors {
    fn default() -> Self {
        let params = KnnParams::default();
        KNearestNeighbors {
            name: format!("k-Nearest Neighbors (k={})", params.k),
            params,
            x_train: None,
            y_train: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }
}

impl Model for KNearestNeighbors {
    fn fit(&mut self, x: &Matrix, y: &[f64]) -> MlResult<()> {
        let (x_train, y_train) = self
            .lifecycle
            .fit(&self.name, x, y, |x, y| Ok((x.clone(), y.to_vec())))?;
        self.x_train = Some(x_train);
        self.y_train = y_train;
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        self.lifecycle.check_input("predict", x)?;
        let x_train = self.x_train.as_ref().ok_or(MlError::NotFitted("predict"))?;
        Ok(x.iter_rows().map(|q| self.predict_one(x_train, q)).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn task(&self) -> TaskType {
        TaskType::Classification
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn clusters() -> (Matrix, Vec<f64>) {
        let x = Matrix::from_rows(&[
            vec![0.0, 0.0],
            vec![0.5, 0.0],
            vec![0.0, 0.5],
            vec![5.0, 5.0],
            vec![5.5, 5.0],
            vec![5.0, 5.5],
        ])
        .unwrap();
        (x, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
    }

    #[test]
    fn test_euclidean() {
        assert_abs_diff_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_k1_reproduces_training_labels() {
        let (x, y) = clusters();
        let mut knn = KNearestNeighbors::new(1).unwrap();
        knn.fit(&x, &y).unwrap();
        assert_eq!(knn.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_k3_classifies_new_points() {
        let (x, y) = clusters();
        let mut knn = KNearestNeighbors::new(3).unwrap();
        knn.fit(&x, &y).unwrap();
        let q = Matrix::from_rows(&[vec![0.2, 0.2], vec![4.8, 5.1]]).unwrap();
        assert_eq!(knn.predict(&q).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_k_larger_than_training_set() {
        let (x, y) = clusters();
        let mut knn = KNearestNeighbors::new(100).unwrap();
        knn.fit(&x, &y).unwrap();
        // All six points vote, 3 vs 3: the lowest label wins.
        let q = Matrix::from_rows(&[vec![5.0, 5.0]]).unwrap();
        assert_eq!(knn.predict(&q).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_distance_tie_keeps_training_order() {
        // Both neighbours are at distance 1; the first training row wins with k=1.
        let x = Matrix::from_rows(&[vec![1.0], vec![-1.0]]).unwrap();
        let mut knn = KNearestNeighbors::new(1).unwrap();
        knn.fit(&x, &[4.0, 2.0]).unwrap();
        assert_eq!(knn.predict(&Matrix::column_vector(&[0.0])).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_training_data_is_copied() {
        let (mut x, y) = clusters();
        let mut knn = KNearestNeighbors::new(1).unwrap();
        knn.fit(&x, &y).unwrap();
        x.set(0, 0, 100.0);
        let q = Matrix::from_rows(&[vec![0.0, 0.0]]).unwrap();
        assert_eq!(knn.predict(&q).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_name_and_defaults() {
        assert_eq!(KNearestNeighbors::default().name(), "k-Nearest Neighbors (k=7)");
        assert_eq!(KNearestNeighbors::new(3).unwrap().name(), "k-Nearest Neighbors (k=3)");
    }

    #[test]
    fn test_k_zero_rejected() {
        assert!(matches!(
            KNearestNeighbors::new(0),
            Err(MlError::InvalidHyperparameter { name: "k", .. })
        ));
    }

    #[test]
    fn test_not_fitted() {
        let (x, y) = clusters();
        let knn = KNearestNeighbors::default();
        assert_eq!(knn.predict(&x), Err(MlError::NotFitted("predict")));
        assert_eq!(knn.score(&x, &y), Err(MlError::NotFitted("score")));
    }
}
