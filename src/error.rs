//! Error types for the news-summary-eval library.
//!
//! File-level and store-level failures are fatal to a run and surface through
//! [`EvalError`]. Row-level problems in the scorer never reach this type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, querying, or scoring news summaries.
#[derive(Error, Debug)]
pub enum EvalError {
    /// No candidate encoding produced a parseable table
    #[error("Failed to read {}: tried {}", path.display(), attempts.join("; "))]
    SourceUnreadable {
        /// File that could not be read
        path: PathBuf,
        /// One entry per attempt, `"<encoding>: <reason>"`
        attempts: Vec<String>,
    },

    /// Source headers do not contain every mapped column
    #[error(
        "Missing columns in {}: expected {:?}, found {:?}",
        path.display(),
        missing,
        found
    )]
    MissingColumns {
        /// Source file
        path: PathBuf,
        /// Labels that were not present
        missing: Vec<String>,
        /// Headers actually present in the file
        found: Vec<String>,
    },

    /// Bulk insert failed and the transaction was rolled back
    #[error("Insert failed at source row {row}: {source}")]
    InsertFailed {
        /// 1-based data row in the source file
        row: usize,
        /// Underlying SQLite error
        #[source]
        source: rusqlite::Error,
    },

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid scorer or vectorizer settings
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Result with `EvalError`
pub type Result<T> = std::result::Result<T, EvalError>;
