use std::io;

use thiserror::Error;

/// Structural failures raised while building a record store.
///
/// Data irregularities (bad dates, zero denominators, unknown regions) are
/// not errors; they surface as `None` values in the results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("required field '{field}' is absent from every input row")]
    MissingField { field: &'static str },
    #[error("csv decode failed: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
