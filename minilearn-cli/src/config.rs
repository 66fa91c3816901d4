use std::fs;
use std::path::Path;

use anyhow::Context;
use minilearn::linear::{LinearRegressionParams, LogisticRegressionParams};
use minilearn::naive_bayes::GaussianNbParams;
use minilearn::neighbors::KnnParams;
use minilearn::tree::DecisionTreeParams;
use serde::{Deserialize, Serialize};

/// How the CSV file is turned into train/test partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub target: String,
    pub test_ratio: f64,
    pub seed: u64,
    pub one_hot: bool,
    pub normalize: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            target: "income".to_string(),
            test_ratio: 0.2,
            seed: 42,
            one_hot: true,
            normalize: true,
        }
    }
}

/// Full experiment description, usually read from a JSON file.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub data: DataConfig,
    pub linear: LinearRegressionParams,
    pub logistic: LogisticRegressionParams,
    pub knn: KnnParams,
    pub tree: DecisionTreeParams,
    pub naive_bayes: GaussianNbParams,
}

impl ExperimentConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = ExperimentConfig::default();
        assert_eq!(cfg.data.test_ratio, 0.2);
        assert_eq!(cfg.data.seed, 42);
        assert_eq!(cfg.knn.k, 7);
        assert_eq!(cfg.tree.max_depth, 5);
        assert_eq!(cfg.logistic.epochs, 400);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"data": {{"target": "label"}}, "knn": {{"k": 3}}}}"#).unwrap();
        file.flush().unwrap();

        let cfg = ExperimentConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.data.target, "label");
        assert_eq!(cfg.data.seed, 42);
        assert_eq!(cfg.knn.k, 3);
        assert_eq!(cfg.tree, DecisionTreeParams::default());
    }

    #[test]
    fn test_bad_json_is_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();
        file.flush().unwrap();
        assert!(ExperimentConfig::from_file(file.path()).is_err());
    }
}
