use thiserror::Error;

/// Error type shared by every minilearn model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MlError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid hyperparameter `{name}`: {reason}")]
    InvalidHyperparameter { name: &'static str, reason: String },

    #[error("Model not fitted: call fit() before {0}()")]
    NotFitted(&'static str),

    #[error("Dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl MlError {
    pub fn invalid_hyperparameter(name: &'static str, reason: impl Into<String>) -> Self {
        MlError::InvalidHyperparameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type MlResult<T> = Result<T, MlError>;
