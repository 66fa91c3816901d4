use minilearn_core::MlError;
use thiserror::Error;

/// Errors raised while loading or preparing a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV input is empty: no header row")]
    EmptyFile,

    #[error("Target column `{0}` not found in header")]
    MissingTarget(String),

    #[error("No data rows matched the header")]
    NoRows,

    #[error(transparent)]
    Model(#[from] MlError),
}

pub type DataResult<T> = Result<T, DataError>;
