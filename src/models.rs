//! Data models for the loader and the scorer
//!
//! Stored records, insert payloads, in-memory text pairs, and the score rows
//! that make up an evaluation report.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A row of the `news_summaries` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRecord {
    /// Database primary key
    pub id: i64,
    /// Original article title
    pub original_title: String,
    /// Generated summary
    pub summary: String,
    /// Timestamp assigned by the store at insertion
    pub created_at: NaiveDateTime,
}

/// Insert payload for the bulk load
///
/// Empty source cells are carried as `None` so that the store's `NOT NULL`
/// constraints reject them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNewsRecord {
    /// Original article title
    pub original_title: Option<String>,
    /// Generated summary
    pub summary: Option<String>,
}

impl NewNewsRecord {
    /// Build a payload from raw cells, mapping empty cells to `None`.
    #[must_use]
    pub fn from_cells(original_title: &str, summary: &str) -> Self {
        let non_empty = |cell: &str| (!cell.is_empty()).then(|| cell.to_string());
        Self {
            original_title: non_empty(original_title),
            summary: non_empty(summary),
        }
    }
}

/// A normalized (original, summary) pair aligned by row position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPair {
    /// Normalized original article text
    pub original: String,
    /// Normalized summary text
    pub summary: String,
}

/// Similarity scores for one surviving pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Normalized original article text
    pub original_text: String,
    /// Normalized summary text
    pub summary_text: String,
    /// TF-IDF cosine similarity in `[0, 1]`
    pub tfidf_score: f64,
    /// Jaccard similarity of whitespace tokens in `[0, 1]`
    pub jaccard_score: f64,
    /// Overlap of the most frequent tokens in `[0, 1]`
    pub keyword_score: f64,
}

/// Mean score per metric over an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    /// Number of scored pairs
    pub pairs: usize,
    /// Mean TF-IDF cosine, `None` when no pair survived
    pub tfidf_mean: Option<f64>,
    /// Mean Jaccard score, `None` when no pair survived
    pub jaccard_mean: Option<f64>,
    /// Mean keyword overlap, `None` when no pair survived
    pub keyword_mean: Option<f64>,
}

impl ScoreSummary {
    /// Compute the per-metric means of `records`.
    #[must_use]
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        let mean = |score: fn(&ScoreRecord) -> f64| {
            if records.is_empty() {
                None
            } else {
                Some(records.iter().map(score).sum::<f64>() / records.len() as f64)
            }
        };

        Self {
            pairs: records.len(),
            tfidf_mean: mean(|r| r.tfidf_score),
            jaccard_mean: mean(|r| r.jaccard_score),
            keyword_mean: mean(|r| r.keyword_score),
        }
    }
}

/// Output format for evaluation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Comma-separated values with a UTF-8 byte-order mark
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Parse a format name as used in configuration (`csv` or `json`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tfidf: f64, jaccard: f64, keyword: f64) -> ScoreRecord {
        ScoreRecord {
            original_text: String::new(),
            summary_text: String::new(),
            tfidf_score: tfidf,
            jaccard_score: jaccard,
            keyword_score: keyword,
        }
    }

    #[test]
    fn test_summary_means() {
        let summary = ScoreSummary::from_records(&[record(0.2, 0.5, 1.0), record(0.4, 0.0, 0.0)]);
        assert_eq!(summary.pairs, 2);
        assert!((summary.tfidf_mean.unwrap() - 0.3).abs() < 1e-12);
        assert!((summary.jaccard_mean.unwrap() - 0.25).abs() < 1e-12);
        assert!((summary.keyword_mean.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = ScoreSummary::from_records(&[]);
        assert_eq!(summary.pairs, 0);
        assert_eq!(summary.tfidf_mean, None);
    }

    #[test]
    fn test_empty_cells_become_none() {
        let payload = NewNewsRecord::from_cells("", "요약");
        assert_eq!(payload.original_title, None);
        assert_eq!(payload.summary.as_deref(), Some("요약"));
    }

    #[test]
    fn test_report_format_names() {
        assert_eq!(ReportFormat::from_name("CSV"), Some(ReportFormat::Csv));
        assert_eq!(ReportFormat::from_name("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_name("xml"), None);
        assert_eq!(ReportFormat::Json.extension(), "json");
    }
}
