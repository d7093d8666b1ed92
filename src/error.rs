//! Error types for bgi2gsea

use thiserror::Error;

/// Main error type for the conversion pipeline
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Input file not found: {path}")]
    MissingFile { path: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Unknown file format / bad header line in {path}")]
    UnknownFormat { path: String },

    #[error("Malformed row in file {path} (line {line}): {reason}")]
    MalformedRow {
        path: String,
        line: u64,
        reason: String,
    },

    #[error("Gene {gene} is missing in file {path}")]
    GeneMissing { gene: String, path: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PrepError>;
