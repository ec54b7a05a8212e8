//! Evaluation report output.
//!
//! Writes the score table to a timestamped file and renders the console
//! summary (means and a few sample rows).

use chrono::{DateTime, Local};
use csv::Writer;
use std::fmt::Write as _;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::loader::truncate_chars;
use crate::models::{ReportFormat, ScoreRecord, ScoreSummary};

/// Column order of the score table.
pub const REPORT_COLUMNS: [&str; 5] = [
    "original_text",
    "summary_text",
    "tfidf_score",
    "jaccard_score",
    "keyword_score",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// File name `<prefix>_<YYYYmmdd_HHMMSS>.<ext>`.
#[must_use]
pub fn timestamped_file_name(prefix: &str, at: DateTime<Local>, format: ReportFormat) -> String {
    format!("{prefix}_{}.{}", at.format("%Y%m%d_%H%M%S"), format.extension())
}

/// Write `records` into `output_dir` under a timestamped name.
///
/// The table is written even when `records` is empty.
///
/// # Returns
///
/// Path of the created file
pub fn write_report(
    records: &[ScoreRecord],
    format: ReportFormat,
    output_dir: &Path,
    prefix: &str,
    at: DateTime<Local>,
) -> Result<PathBuf> {
    create_dir_all(output_dir)?;
    let file_path = output_dir.join(timestamped_file_name(prefix, at, format));
    write_report_to_file(records, format, &file_path)?;
    Ok(file_path)
}

/// Write `records` to `file_path` in the given format.
pub fn write_report_to_file(records: &[ScoreRecord], format: ReportFormat, file_path: &Path) -> Result<()> {
    match format {
        ReportFormat::Csv => write_csv_file(records, file_path),
        ReportFormat::Json => write_json_file(records, file_path),
    }
}

/// Write records to a CSV file, prefixed with a UTF-8 byte-order mark so
/// spreadsheet tools pick the right encoding for Hangul.
fn write_csv_file(records: &[ScoreRecord], file_path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(file_path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = Writer::from_writer(file);
    writer.write_record(REPORT_COLUMNS)?;

    for record in records {
        let tfidf = format_score(record.tfidf_score);
        let jaccard = format_score(record.jaccard_score);
        let keyword = format_score(record.keyword_score);
        writer.write_record([
            record.original_text.as_str(),
            record.summary_text.as_str(),
            tfidf.as_str(),
            jaccard.as_str(),
            keyword.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Shortest round-trip form, keeping `.0` on whole values (`1.0`, not `1`).
fn format_score(score: f64) -> String {
    format!("{score:?}")
}

/// Write records to a JSON file as an array of objects.
fn write_json_file(records: &[ScoreRecord], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

fn format_mean(mean: Option<f64>) -> String {
    mean.map_or_else(|| "n/a".to_string(), |m| format!("{m:.4}"))
}

/// Console summary: pair count, per-metric means, and up to `sample_rows`
/// sample rows with text cut to `preview_chars` characters.
#[must_use]
pub fn render_summary(records: &[ScoreRecord], sample_rows: usize, preview_chars: usize) -> String {
    let summary = ScoreSummary::from_records(records);
    let mut out = String::new();

    let _ = writeln!(out, "Scored pairs: {}", summary.pairs);
    let _ = writeln!(out, "TF-IDF mean: {}", format_mean(summary.tfidf_mean));
    let _ = writeln!(out, "Jaccard mean: {}", format_mean(summary.jaccard_mean));
    let _ = writeln!(out, "Keyword mean: {}", format_mean(summary.keyword_mean));

    let samples = records.iter().take(sample_rows).collect::<Vec<_>>();
    if !samples.is_empty() {
        let _ = writeln!(out, "\nSample results ({}):", samples.len());
    }
    for record in samples {
        let _ = writeln!(out);
        let _ = writeln!(out, "Original: {}...", truncate_chars(&record.original_text, preview_chars));
        let _ = writeln!(out, "Summary: {}...", truncate_chars(&record.summary_text, preview_chars));
        let _ = writeln!(
            out,
            "TF-IDF: {:.2}, Jaccard: {:.2}, Keyword: {:.2}",
            record.tfidf_score, record.jaccard_score, record.keyword_score
        );
    }

    out
}
