//! Unit tests for validation.rs module

use std::fs;

use news_summary_eval::validation::{InputValidator, MAX_SEARCH_TERM_CHARS};
use tempfile::tempdir;

#[test]
fn test_validate_search_term_valid() {
    assert!(InputValidator::validate_search_term("정치").is_ok());
    assert!(InputValidator::validate_search_term("100% 인상").is_ok());
}

#[test]
fn test_validate_search_term_exactly_max_chars() {
    let term = "가".repeat(MAX_SEARCH_TERM_CHARS);
    assert!(InputValidator::validate_search_term(&term).is_ok());
}

#[test]
fn test_validate_search_term_too_long() {
    let term = "가".repeat(MAX_SEARCH_TERM_CHARS + 1);
    assert!(InputValidator::validate_search_term(&term).is_err());
}

#[test]
fn test_validate_search_term_with_null_byte() {
    assert!(InputValidator::validate_search_term("정\0치").is_err());
}

#[test]
fn test_validate_search_term_with_line_breaks() {
    assert!(InputValidator::validate_search_term("정치\n경제").is_err());
    assert!(InputValidator::validate_search_term("정치\r").is_err());
}

#[test]
fn test_validate_source_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("news.csv");
    fs::write(&path, "원본_제목,요약\n").expect("Failed to write file");

    assert!(InputValidator::validate_source_file(&path).is_ok());
    assert!(InputValidator::validate_source_file(&temp_dir.path().join("absent.csv")).is_err());
    assert!(InputValidator::validate_source_file(temp_dir.path()).is_err());
}

#[test]
fn test_validate_output_dir() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let file = temp_dir.path().join("report.csv");
    fs::write(&file, "").expect("Failed to write file");

    assert!(InputValidator::validate_output_dir(temp_dir.path()).is_ok());
    assert!(InputValidator::validate_output_dir(&temp_dir.path().join("new_dir")).is_ok());
    assert!(InputValidator::validate_output_dir(&file).is_err());
}
