use minilearn_core::{Matrix, MlError, MlResult};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::scaler::StandardScaler;

/// Feature matrix plus target vector with matching row counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Matrix,
    targets: Vec<f64>,
    feature_names: Vec<String>,
    target_classes: Vec<String>,
}

impl Dataset {
    pub fn new(features: Matrix, targets: Vec<f64>) -> MlResult<Self> {
        if features.rows() != targets.len() {
            return Err(MlError::InvalidInput(format!(
                "X and y must have same number of samples: X={}, y={}",
                features.rows(),
                targets.len()
            )));
        }
        Ok(Dataset {
            features,
            targets,
            feature_names: Vec::new(),
            target_classes: Vec::new(),
        })
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = names;
        self
    }

    /// Class names behind the encoded targets, when the target column was
    /// label-encoded.
    pub fn with_target_classes(mut self, classes: Vec<String>) -> Self {
        self.target_classes = classes;
        self
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target_classes(&self) -> &[String] {
        &self.target_classes
    }

    pub fn n_samples(&self) -> usize {
        self.features.rows()
    }

    pub fn n_features(&self) -> usize {
        self.features.cols()
    }

    /// Subset of rows, in the given order, keeping the metadata.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_rows(indices),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            feature_names: self.feature_names.clone(),
            target_classes: self.target_classes.clone(),
        }
    }

    /// Shuffle rows with `rng` and hold out `floor(n * test_ratio)` of them.
    ///
    /// Returns `(train, test)`. The same generator state always produces the
    /// same partition.
    pub fn train_test_split<R>(&self, test_ratio: f64, rng: &mut R) -> MlResult<(Dataset, Dataset)>
    where
        R: Rng + ?Sized,
    {
        if !(0.0..=1.0).contains(&test_ratio) {
            return Err(MlError::InvalidInput(format!(
                "test ratio must be within [0, 1], got {test_ratio}"
            )));
        }
        let n = self.n_samples();
        let test_count = (n as f64 * test_ratio).floor() as usize;
        let train_count = n - test_count;

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);

        Ok((
            self.select(&indices[..train_count]),
            self.select(&indices[train_count..]),
        ))
    }

    fn with_features(&self, features: Matrix) -> Dataset {
        Dataset {
            features,
            targets: self.targets.clone(),
            feature_names: self.feature_names.clone(),
            target_classes: self.target_classes.clone(),
        }
    }
}

/// Z-score both partitions with statistics fitted on `train` only.
pub fn standardize(train: &Dataset, test: &Dataset) -> MlResult<(Dataset, Dataset, StandardScaler)> {
    let mut scaler = StandardScaler::new();
    let train_x = scaler.fit_transform(train.features())?;
    let test_x = scaler.transform(test.features())?;
    Ok((train.with_features(train_x), test.with_features(test_x), scaler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn numbered(n: usize) -> Dataset {
        let x: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..n).map(|i| i as f64 * 10.0).collect();
        Dataset::new(Matrix::from_rows(&x).unwrap(), y).unwrap()
    }

    #[test]
    fn test_new_checks_lengths() {
        let x = Matrix::from_rows(&[vec![1.0], vec![2.0]]).unwrap();
        assert!(matches!(Dataset::new(x, vec![1.0]), Err(MlError::InvalidInput(_))));
    }

    #[test]
    fn test_split_sizes_use_floor() {
        let ds = numbered(11);
        let mut rng = StdRng::seed_from_u64(42);
        let (train, test) = ds.train_test_split(0.2, &mut rng).unwrap();
        assert_eq!(test.n_samples(), 2);
        assert_eq!(train.n_samples(), 9);
    }

    #[test]
    fn test_split_is_partition_and_keeps_pairs() {
        let ds = numbered(20);
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = ds.train_test_split(0.25, &mut rng).unwrap();

        let mut seen: Vec<f64> = train
            .features()
            .column(0)
            .into_iter()
            .chain(test.features().column(0))
            .collect();
        seen.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(seen, (0..20).map(|i| i as f64).collect::<Vec<_>>());

        for (row, &y) in train.features().iter_rows().zip(train.targets()) {
            assert_abs_diff_eq!(row[0] * 10.0, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_split_deterministic_per_seed() {
        let ds = numbered(30);
        let a = ds.train_test_split(0.2, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = ds.train_test_split(0.2, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_rejects_bad_ratio() {
        let ds = numbered(5);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(ds.train_test_split(1.5, &mut rng).is_err());
        assert!(ds.train_test_split(-0.1, &mut rng).is_err());
    }

    #[test]
    fn test_standardize_fits_on_train_only() {
        let train = Dataset::new(Matrix::column_vector(&[0.0, 2.0]), vec![0.0, 1.0]).unwrap();
        let test = Dataset::new(Matrix::column_vector(&[4.0]), vec![1.0]).unwrap();
        let (train_z, test_z, scaler) = standardize(&train, &test).unwrap();

        assert_eq!(scaler.mean.as_deref(), Some(&[1.0][..]));
        assert_eq!(train_z.features().data(), &[-1.0, 1.0]);
        assert_abs_diff_eq!(test_z.features().get(0, 0), 3.0, epsilon = 1e-12);
        assert_eq!(test_z.targets(), &[1.0]);
    }
}
