use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the data layer (loading, schema mapping, sampling).
#[derive(Debug, Error)]
pub enum DataError {
    /// The source file does not exist or cannot be opened.
    #[error("data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// One or more expected raw columns are absent from the source header.
    #[error("missing expected column(s): {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// A numeric cell could not be parsed. `row` is 1-based over data rows.
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown measurement: '{0}'")]
    UnknownMeasurement(String),

    #[error("unsupported file layout: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

impl DataError {
    /// Whether this error means the source itself is unavailable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound { .. })
    }
}

pub type DataResult<T> = std::result::Result<T, DataError>;
