//! CSV-to-SQLite loader for news summaries.
//!
//! The source CSV uses Korean column labels. [`ColumnMapping`] renames them to
//! the canonical store columns, [`load_news_csv`] replaces the table contents
//! with the file, and [`query_news`] is the read path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::db::Database;
use crate::error::{EvalError, Result};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{NewNewsRecord, NewsRecord};
use crate::reader::{read_table, SourceEncoding};
use crate::schema::news_summaries;

/// Rows returned by an unfiltered query unless configured otherwise.
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// One source-label to canonical-column rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRename {
    /// Header label as it appears in the source file
    pub source_label: String,
    /// Store column it maps to
    pub canonical: String,
}

/// Declarative header rename table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    renames: Vec<ColumnRename>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::new(&[
            ("원본_제목", news_summaries::ORIGINAL_TITLE),
            ("요약", news_summaries::SUMMARY),
        ])
    }
}

impl ColumnMapping {
    /// Build a mapping from `(source label, canonical name)` pairs.
    #[must_use]
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            renames: pairs
                .iter()
                .map(|(source_label, canonical)| ColumnRename {
                    source_label: (*source_label).to_string(),
                    canonical: (*canonical).to_string(),
                })
                .collect(),
        }
    }

    /// Renames in declaration order.
    #[must_use]
    pub fn renames(&self) -> &[ColumnRename] {
        &self.renames
    }

    /// Headers after renaming; unmapped headers pass through unchanged.
    #[must_use]
    pub fn rename_headers(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|header| {
                self.renames
                    .iter()
                    .find(|r| &r.source_label == header)
                    .map_or_else(|| header.clone(), |r| r.canonical.clone())
            })
            .collect()
    }

    /// Column index of every rename, in declaration order.
    ///
    /// A header matches if it equals either the source label or the canonical
    /// name. Fails with [`EvalError::MissingColumns`] listing every absent
    /// label.
    pub fn resolve(&self, path: &Path, headers: &[String]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(self.renames.len());
        let mut missing = Vec::new();

        for rename in &self.renames {
            let position = headers
                .iter()
                .position(|h| h == &rename.source_label)
                .or_else(|| headers.iter().position(|h| h == &rename.canonical));
            match position {
                Some(index) => indices.push(index),
                None => missing.push(rename.source_label.clone()),
            }
        }

        if missing.is_empty() {
            Ok(indices)
        } else {
            Err(EvalError::MissingColumns {
                path: path.to_path_buf(),
                missing,
                found: headers.to_vec(),
            })
        }
    }

    /// Source column index for `canonical`, given the output of [`Self::resolve`].
    pub fn column_index(&self, canonical: &str, resolved: &[usize]) -> Result<usize> {
        self.renames
            .iter()
            .position(|r| r.canonical == canonical)
            .and_then(|pos| resolved.get(pos).copied())
            .ok_or_else(|| EvalError::InvalidConfig(format!("No column is mapped to '{canonical}'")))
    }
}

/// Summary of a completed load
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Rows read from the source file
    pub rows_read: usize,
    /// Encoding the source was decoded with
    pub encoding: SourceEncoding,
    /// Source headers as found
    pub source_headers: Vec<String>,
    /// Headers after renaming
    pub renamed_headers: Vec<String>,
    /// Rows present in the store afterwards
    pub stored_rows: usize,
    /// First stored records, for a console preview
    pub preview: Vec<NewsRecord>,
}

/// Replace the contents of the store at `db_path` with the rows of `csv_path`.
///
/// The CSV is read and its headers resolved before the store is opened, so a
/// parse failure leaves the store untouched. The table is then dropped and
/// recreated, rows are inserted in one transaction, and the lookup indexes are
/// built. An insert failure rolls back and leaves the new table empty.
pub fn load_news_csv(
    csv_path: &Path,
    db_path: &Path,
    mapping: &ColumnMapping,
    preview_rows: usize,
) -> Result<LoadReport> {
    let timer = OperationTimer::new("load_news_csv");
    let metrics = MetricsCollector::default();

    let decoded = read_table(csv_path)?;
    let table = decoded.table;
    info!(rows = table.len(), columns = ?table.headers, "CSV loaded");

    let indices = mapping.resolve(csv_path, &table.headers)?;
    let renamed_headers = mapping.rename_headers(&table.headers);
    info!(columns = ?renamed_headers, "Columns renamed");

    let title_idx = mapping.column_index(news_summaries::ORIGINAL_TITLE, &indices)?;
    let summary_idx = mapping.column_index(news_summaries::SUMMARY, &indices)?;
    let records: Vec<NewNewsRecord> = table
        .rows
        .iter()
        .map(|row| {
            let cell = |i: usize| row.get(i).map_or("", String::as_str);
            NewNewsRecord::from_cells(cell(title_idx), cell(summary_idx))
        })
        .collect();

    let mut db = Database::open(db_path)?;
    db.recreate_table()?;

    let inserted = match db.bulk_insert(&records) {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "Insert failed, transaction rolled back");
            metrics.record_load(0, false);
            return Err(e);
        }
    };
    info!("Inserted {} rows", inserted);

    db.create_indexes()?;

    let stored_rows = db.count()?;
    let preview = db.first_records(preview_rows)?;
    metrics.record_load(stored_rows, true);
    timer.finish();

    Ok(LoadReport {
        rows_read: table.len(),
        encoding: decoded.encoding,
        source_headers: table.headers,
        renamed_headers,
        stored_rows,
        preview,
    })
}

/// Result of a store query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The store file does not exist
    StoreAbsent(PathBuf),
    /// Matching records, newest first (possibly none)
    Records(Vec<NewsRecord>),
}

/// Query the store at `db_path`.
///
/// With a non-empty `search_term`, returns every record whose title or summary
/// contains it. Otherwise returns the `limit` most recent records. A missing
/// store is reported as [`QueryOutcome::StoreAbsent`], not as an error.
pub fn query_news(db_path: &Path, search_term: Option<&str>, limit: usize) -> Result<QueryOutcome> {
    if !db_path.exists() {
        warn!(path = %db_path.display(), "Store file does not exist");
        return Ok(QueryOutcome::StoreAbsent(db_path.to_path_buf()));
    }

    let metrics = MetricsCollector::default();
    let db = Database::open_read_only(db_path)?;

    let records = match search_term.filter(|term| !term.is_empty()) {
        Some(term) => {
            let records = db.search(term)?;
            metrics.record_query("search", records.len());
            records
        }
        None => {
            let records = db.latest(limit)?;
            metrics.record_query("latest", records.len());
            records
        }
    };

    info!("Query returned {} records", records.len());
    Ok(QueryOutcome::Records(records))
}

/// CSV files directly inside `dir`, sorted by name.
///
/// Offered as suggestions when the configured source file is missing.
pub fn list_csv_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates)
}

/// Cut `text` to at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
