use std::path::Path;

use crate::error::{EvalError, Result};

/// Longest accepted search term, in characters
pub const MAX_SEARCH_TERM_CHARS: usize = 200;

/// Validation utilities for command-line input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a query search term
    pub fn validate_search_term(term: &str) -> Result<()> {
        if term.chars().count() > MAX_SEARCH_TERM_CHARS {
            return Err(EvalError::InvalidInput(format!(
                "Search term too long (max {MAX_SEARCH_TERM_CHARS} characters)"
            )));
        }

        if term.contains('\0') || term.contains('\r') || term.contains('\n') {
            return Err(EvalError::InvalidInput(
                "Search term contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate that a source file exists and is a regular file
    pub fn validate_source_file(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(EvalError::InvalidInput("Source path cannot be empty".to_string()));
        }

        if !path.exists() {
            return Err(EvalError::InvalidInput(format!(
                "Source file does not exist: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(EvalError::InvalidInput(format!(
                "Source path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Validate that a report directory is usable (absent or a directory)
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(EvalError::InvalidInput(format!(
                "Output path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }
}
