//! Errors the CLI reports before exiting

use shahada::ShahadaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Shahada(#[from] ShahadaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {total} batch jobs failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("{0}")]
    Usage(String),
}
