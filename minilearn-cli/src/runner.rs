use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use minilearn::data::{standardize, CsvLoader, Dataset};
use minilearn::linear::{LinearRegression, LogisticRegression};
use minilearn::metrics::{MetricsBundle, TaskType};
use minilearn::model::Model;
use minilearn::naive_bayes::GaussianNaiveBayes;
use minilearn::neighbors::KNearestNeighbors;
use minilearn::tree::DecisionTree;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::{DataConfig, ExperimentConfig};

/// Algorithms the driver can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Linear,
    Logistic,
    Knn,
    Tree,
    NaiveBayes,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Linear,
        Algorithm::Logistic,
        Algorithm::Knn,
        Algorithm::Tree,
        Algorithm::NaiveBayes,
    ];

    /// Short id used in result files.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Linear => "linear",
            Algorithm::Logistic => "logistic",
            Algorithm::Knn => "knn",
            Algorithm::Tree => "tree",
            Algorithm::NaiveBayes => "naivebayes",
        }
    }

    pub fn build(self, config: &ExperimentConfig) -> anyhow::Result<Box<dyn Model>> {
        let model: Box<dyn Model> = match self {
            Algorithm::Linear => Box::new(LinearRegression::from_params(config.linear)?),
            Algorithm::Logistic => Box::new(LogisticRegression::from_params(config.logistic)?),
            Algorithm::Knn => Box::new(KNearestNeighbors::from_params(config.knn)?),
            Algorithm::Tree => Box::new(DecisionTree::from_params(config.tree)?),
            Algorithm::NaiveBayes => Box::new(GaussianNaiveBayes::from_params(config.naive_bayes)?),
        };
        Ok(model)
    }
}

/// Outcome of training and scoring one model.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub algorithm: Algorithm,
    pub train_secs: f64,
    pub metrics: MetricsBundle,
}

impl RunResult {
    /// `Rust,<algo>,<train secs>,<metric 1>,<metric 2>`
    pub fn result_line(&self) -> String {
        let [m1, m2] = self.metrics.task_type().metric_names();
        format!(
            "Rust,{},{:.4},{:.4},{:.4}",
            self.algorithm.id(),
            self.train_secs,
            self.metrics.get_metric(m1),
            self.metrics.get_metric(m2)
        )
    }

    pub fn write_to(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let path = dir.join(format!("rust_{}.txt", self.algorithm.id()));
        fs::write(&path, format!("{}\n", self.result_line()))
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// Load the CSV, split it and optionally standardize with train statistics.
pub fn prepare_data(path: &Path, config: &DataConfig) -> anyhow::Result<(Dataset, Dataset)> {
    let loader = CsvLoader::from_path(path, &config.target)
        .with_context(|| format!("loading {}", path.display()))?;
    let dataset = loader.prepare(config.one_hot)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (train, test) = dataset.train_test_split(config.test_ratio, &mut rng)?;
    info!(train = train.n_samples(), test = test.n_samples(), "split dataset");

    if config.normalize {
        let (train, test, _) = standardize(&train, &test)?;
        Ok((train, test))
    } else {
        Ok((train, test))
    }
}

/// Fit `algorithm` on `train` and score it on `test`.
pub fn run_algorithm(
    algorithm: Algorithm,
    config: &ExperimentConfig,
    train: &Dataset,
    test: &Dataset,
) -> anyhow::Result<RunResult> {
    let mut model = algorithm.build(config)?;
    model
        .fit(train.features(), train.targets())
        .with_context(|| format!("training {}", model.name()))?;
    let metrics = model.score(test.features(), test.targets())?;
    let train_secs = model.train_time().map(|d| d.as_secs_f64()).unwrap_or(0.0);
    Ok(RunResult {
        algorithm,
        train_secs,
        metrics,
    })
}

/// Per-model report in the `Algorithm / Train time / Metric` layout.
pub fn format_report(result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Algorithm: {}", result.metrics.model_name());
    let _ = writeln!(out, "Train time: {:.4} seconds", result.train_secs);
    for (i, name) in result.metrics.task_type().metric_names().iter().enumerate() {
        let _ = writeln!(out, "Metric {}: {}: {:.4}", i + 1, name, result.metrics.get_metric(name));
    }
    out
}

/// Side-by-side comparison of several runs.
pub fn format_table(results: &[RunResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<35} {:<15} {:<12} {:<12} {:<12}",
        "Model", "Task", "TrainTime(s)", "Metric 1", "Metric 2"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));
    for r in results {
        let task = r.metrics.task_type();
        let [m1, m2] = task.metric_names();
        let _ = writeln!(
            out,
            "{:<35} {:<15} {:<12.4} {:<12} {:<12}",
            r.metrics.model_name(),
            task.to_string(),
            r.train_secs,
            format!("{m1}={:.4}", r.metrics.get_metric(m1)),
            format!("{m2}={:.4}", r.metrics.get_metric(m2)),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "x1,x2,kind,label").unwrap();
        for i in 0..30 {
            let jitter = (i % 3) as f64 * 0.1;
            if i % 2 == 0 {
                writeln!(file, "{},{},a,0", jitter, 1.0 - jitter).unwrap();
            } else {
                writeln!(file, "{},{},b,1", 4.0 + jitter, 5.0 + jitter).unwrap();
            }
        }
        file.flush().unwrap();
        file
    }

    fn config() -> ExperimentConfig {
        let mut cfg = ExperimentConfig::default();
        cfg.data.target = "label".to_string();
        cfg.knn.k = 3;
        cfg
    }

    #[test]
    fn test_prepare_data_split_sizes() {
        let file = csv_file();
        let (train, test) = prepare_data(file.path(), &config().data).unwrap();
        assert_eq!(test.n_samples(), 6);
        assert_eq!(train.n_samples(), 24);
        assert_eq!(train.n_features(), 4);
    }

    #[test]
    fn test_every_algorithm_runs() {
        let file = csv_file();
        let cfg = config();
        let (train, test) = prepare_data(file.path(), &cfg.data).unwrap();
        for alg in Algorithm::ALL {
            let result = run_algorithm(alg, &cfg, &train, &test).unwrap();
            let task = alg.build(&cfg).unwrap().task();
            assert_eq!(result.metrics.task_type(), task);
            if task == TaskType::Classification {
                assert_eq!(result.metrics.get_metric("Accuracy"), 1.0, "{}", alg.id());
            }
        }
    }

    #[test]
    fn test_result_file() {
        let file = csv_file();
        let cfg = config();
        let (train, test) = prepare_data(file.path(), &cfg.data).unwrap();
        let result = run_algorithm(Algorithm::NaiveBayes, &cfg, &train, &test).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = result.write_to(&dir.path().join("results")).unwrap();
        assert!(path.ends_with("rust_naivebayes.txt"));

        let line = fs::read_to_string(path).unwrap();
        let fields: Vec<&str> = line.trim().split(',').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(&fields[..2], &["Rust", "naivebayes"]);
        assert_eq!(fields[3], "1.0000");
    }

    #[test]
    fn test_report_and_table() {
        let mut metrics = MetricsBundle::new("Linear Regression (closed-form)", TaskType::Regression);
        metrics.add_metric("RMSE", 0.25);
        metrics.add_metric("R^2", 0.9);
        let result = RunResult {
            algorithm: Algorithm::Linear,
            train_secs: 0.0123,
            metrics,
        };

        let report = format_report(&result);
        assert!(report.contains("Train time: 0.0123 seconds"));
        assert!(report.contains("Metric 1: RMSE: 0.2500"));
        assert!(report.contains("Metric 2: R^2: 0.9000"));

        let table = format_table(&[result.clone()]);
        assert!(table.contains("Regression"));
        assert!(table.contains("RMSE=0.2500"));
        assert_eq!(result.result_line(), "Rust,linear,0.0123,0.2500,0.9000");
    }

    #[test]
    fn test_missing_target_column() {
        let file = csv_file();
        let mut cfg = config();
        cfg.data.target = "nope".to_string();
        assert!(prepare_data(file.path(), &cfg.data).is_err());
    }
}
