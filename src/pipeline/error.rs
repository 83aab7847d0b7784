//! Error types for survey ingestion.
//!
//! Only structural failures surface as errors. Missing columns, malformed
//! indicator values and empty partitions are handled where they occur and
//! never reach this enum.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or exporting a survey table.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// The input file could not be opened or read.
    #[error("failed to read survey file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one the loader understands.
    #[error("unsupported file format: {extension}. Supported formats: csv")]
    UnsupportedFormat { extension: String },

    /// The content could not be parsed as a table at all.
    #[error("survey table could not be parsed: {message}")]
    Malformed { message: String },

    /// The table parsed but has no header columns.
    #[error("survey table has no columns")]
    EmptySchema,

    /// A criteria file was present but not valid JSON for the criteria shape.
    #[error("invalid filter criteria in {path}: {message}")]
    InvalidCriteria { path: PathBuf, message: String },

    /// Any other failure bubbling up from polars.
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type SurveyResult<T> = std::result::Result<T, SurveyError>;
