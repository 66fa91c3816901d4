pub mod error;
pub mod labels;
pub mod matrix;

pub use error::{MlError, MlResult};
pub use labels::{label_counts, majority_label, unique_labels};
pub use matrix::Matrix;
