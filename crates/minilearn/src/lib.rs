//! # minilearn
//!
//! Classical supervised learning from first principles: five models behind
//! one `fit` / `predict` / `score` contract.
//!
//! ## Modules
//!
//! - **core**: row-major `Matrix`, label helpers, `MlError`
//! - **linalg**: normal equations and Gaussian elimination with partial pivoting
//! - **metrics**: accuracy, macro-F1, RMSE, R², `MetricsBundle`
//! - **model**: the `Model` trait and the shared fit lifecycle
//! - **linear**: closed-form ridge regression, logistic regression
//! - **neighbors**: k-nearest neighbours classifier
//! - **tree**: ID3 decision tree over equal-width bins
//! - **naive_bayes**: Gaussian naive Bayes
//! - **data**: CSV loading, one-hot/label encoding, scaling, train/test split

/// Matrix, labels and errors.
pub use minilearn_core as core;

/// Linear system solving.
pub use minilearn_linalg as linalg;

/// Evaluation metrics.
pub use minilearn_metrics as metrics;

/// Model contract.
pub use minilearn_model as model;

/// Linear models.
pub use minilearn_linear as linear;

/// Nearest neighbours.
pub use minilearn_neighbors as neighbors;

/// Decision tree.
pub use minilearn_tree as tree;

/// Naive Bayes.
pub use minilearn_naive_bayes as naive_bayes;

/// Data loading and preparation.
pub use minilearn_data as data;

/// The types most programs need.
pub mod prelude {
    pub use minilearn_core::{Matrix, MlError, MlResult};
    pub use minilearn_data::{CsvLoader, Dataset};
    pub use minilearn_linear::{LinearRegression, LogisticRegression};
    pub use minilearn_metrics::{MetricsBundle, TaskType};
    pub use minilearn_model::Model;
    pub use minilearn_naive_bayes::GaussianNaiveBayes;
    pub use minilearn_neighbors::KNearestNeighbors;
    pub use minilearn_tree::DecisionTree;
}
