//! Error types for the CHROMCAT library.
//!
//! Per-record filter rejections are ordinary control flow and never surface
//! here; only structural faults (malformed lines, I/O failures) become
//! errors and abort the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChromcatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sparse matrix error: {0}")]
    SparseMatrix(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, ChromcatError>;

impl From<nalgebra_sparse::SparseFormatError> for ChromcatError {
    fn from(err: nalgebra_sparse::SparseFormatError) -> Self {
        ChromcatError::SparseMatrix(format!("Sparse format error: {:?}", err))
    }
}

/// Returns `true` if the error originated from a broken pipe.
#[inline]
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.root_cause()
        .downcast_ref::<std::io::Error>()
        .map(|io_err| io_err.kind() == std::io::ErrorKind::BrokenPipe)
        .unwrap_or(false)
}
