//! News Summary Evaluation
//!
//! A Rust library for storing news article/summary pairs and scoring how
//! closely each summary tracks its original.
//!
//! # Features
//!
//! - Load a Korean-labelled CSV into a SQLite store, with substring search
//! - Read CSV files in UTF-8 or legacy Korean encodings
//! - Score summaries with TF-IDF cosine, Jaccard, and keyword overlap
//! - Write timestamped CSV or JSON evaluation reports

/// Configuration management
pub mod config;
/// SQLite store operations
pub mod db;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// CSV-to-store loader and query path
pub mod loader;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Text normalization
pub mod nlp;
/// CSV reading with encoding fallback
pub mod reader;
/// Report writing and console summaries
pub mod report;
/// Database schema definitions
pub mod schema;
/// Batch scoring pipeline
pub mod scorer;
/// Similarity metrics
pub mod similarity;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use db::Database;
pub use error::{EvalError, Result};
pub use models::{NewsRecord, ReportFormat, ScoreRecord, TextPair};
pub use scorer::{EvaluationReport, Scorer, ScoringOptions};
