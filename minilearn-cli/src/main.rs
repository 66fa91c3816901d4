//! minilearn command-line driver
//!
//! Trains one or all models on a CSV file, prints their metrics and writes
//! one result line per model.

mod config;
mod runner;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use config::ExperimentConfig;
use runner::{format_report, format_table, prepare_data, run_algorithm, Algorithm};

#[derive(Parser)]
#[command(name = "minilearn")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and compare classical ML models on a CSV file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train and evaluate a single model
    Run {
        /// Model to train
        #[arg(short, long, value_enum)]
        model: Algorithm,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Train and evaluate every model, then print a comparison table
    Compare {
        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Input CSV file with a header row
    #[arg(short, long)]
    data: PathBuf,

    /// JSON experiment file (data options and hyperparameters)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target column name
    #[arg(short, long)]
    target: Option<String>,

    /// Fraction of rows held out for testing
    #[arg(long)]
    test_ratio: Option<f64>,

    /// Seed for the train/test shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Drop categorical columns instead of one-hot encoding them
    #[arg(long)]
    no_one_hot: bool,

    /// Skip z-score normalisation
    #[arg(long)]
    no_normalize: bool,

    /// Directory for per-model result files
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,
}

impl DataArgs {
    /// Experiment config from file (or defaults) with flags applied on top.
    fn experiment(&self) -> anyhow::Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_file(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(target) = &self.target {
            config.data.target = target.clone();
        }
        if let Some(ratio) = self.test_ratio {
            config.data.test_ratio = ratio;
        }
        if let Some(seed) = self.seed {
            config.data.seed = seed;
        }
        if self.no_one_hot {
            config.data.one_hot = false;
        }
        if self.no_normalize {
            config.data.normalize = false;
        }
        Ok(config)
    }
}

fn execute(algorithms: &[Algorithm], args: &DataArgs) -> anyhow::Result<()> {
    let config = args.experiment()?;
    let (train, test) = prepare_data(&args.data, &config.data)?;
    info!(
        features = train.n_features(),
        train = train.n_samples(),
        test = test.n_samples(),
        "data ready"
    );

    let mut results = Vec::new();
    for &algorithm in algorithms {
        let result = match run_algorithm(algorithm, &config, &train, &test) {
            Ok(r) => r,
            // compare keeps going past a failed model
            Err(e) if algorithms.len() > 1 => {
                warn!(algorithm = algorithm.id(), error = %e, "model failed");
                continue;
            }
            Err(e) => return Err(e),
        };
        println!("{}", format_report(&result));
        let path = result.write_to(&args.results_dir)?;
        info!(path = %path.display(), "wrote result");
        results.push(result);
    }

    if !results.is_empty() {
        println!("{}", format_table(&results));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minilearn=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { model, data } => execute(&[model], &data),
        Commands::Compare { data } => execute(&Algorithm::ALL, &data),
    }
}
