use std::fs;
use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::{debug, info};

use crate::error::{EvalError, Result};
use crate::models::{NewNewsRecord, NewsRecord};
use crate::schema::{self, news_summaries};

/// Escape character for `LIKE` patterns built from user search terms.
const LIKE_ESCAPE: char = '\\';

/// Database manager for the news summary store
///
/// Holds a single connection for one load or query; the connection closes
/// when the value is dropped.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an existing store without write access.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Borrow the underlying connection
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Drop `news_summaries` if present and create it empty.
    ///
    /// Any previous contents are lost.
    pub fn recreate_table(&self) -> Result<()> {
        self.conn.execute(&schema::drop_table_sql(), [])?;
        self.conn.execute(&schema::create_table_sql(), [])?;
        info!("Table '{}' created", news_summaries::TABLE);
        Ok(())
    }

    /// Insert every record in one transaction.
    ///
    /// If any row fails the transaction is rolled back, leaving the table
    /// empty, and the failing row is reported (1-based).
    pub fn bulk_insert(&mut self, records: &[NewNewsRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
                news_summaries::TABLE,
                news_summaries::ORIGINAL_TITLE,
                news_summaries::SUMMARY
            ))?;

            for (i, record) in records.iter().enumerate() {
                stmt.execute(params![record.original_title, record.summary])
                    .map_err(|source| EvalError::InsertFailed { row: i + 1, source })?;
            }
        }
        tx.commit()?;

        debug!("Inserted {} rows", records.len());
        Ok(records.len())
    }

    /// Create the title and creation-time lookup indexes.
    pub fn create_indexes(&self) -> Result<()> {
        self.conn.execute_batch(&schema::create_indexes_sql())?;
        info!("Indexes created");
        Ok(())
    }

    /// Names of the indexes on `news_summaries`.
    pub fn index_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ?1 AND sql IS NOT NULL ORDER BY name",
        )?;
        let names = stmt
            .query_map(params![news_summaries::TABLE], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Total number of stored records.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", news_summaries::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// The first `limit` records in insertion order.
    pub fn first_records(&self, limit: usize) -> Result<Vec<NewsRecord>> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY {} ASC LIMIT ?1",
            Self::columns(),
            news_summaries::TABLE,
            news_summaries::ID
        );
        self.collect(&query, params![limit_param(limit)])
    }

    /// The `limit` most recently created records, newest first.
    pub fn latest(&self, limit: usize) -> Result<Vec<NewsRecord>> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY {} LIMIT ?1",
            Self::columns(),
            news_summaries::TABLE,
            Self::newest_first()
        );
        self.collect(&query, params![limit_param(limit)])
    }

    /// Every record whose title or summary contains `term`, newest first.
    ///
    /// Matching uses `LIKE`, so ASCII letters compare case-insensitively.
    /// Wildcards in `term` match literally.
    pub fn search(&self, term: &str) -> Result<Vec<NewsRecord>> {
        let query = format!(
            "SELECT {cols} FROM {table} WHERE {title} LIKE ?1 ESCAPE '{esc}' OR {summary} LIKE ?1 ESCAPE '{esc}' ORDER BY {order}",
            cols = Self::columns(),
            table = news_summaries::TABLE,
            title = news_summaries::ORIGINAL_TITLE,
            summary = news_summaries::SUMMARY,
            esc = LIKE_ESCAPE,
            order = Self::newest_first()
        );
        let pattern = format!("%{}%", escape_like(term));
        self.collect(&query, params![pattern])
    }

    fn columns() -> String {
        [
            news_summaries::ID,
            news_summaries::ORIGINAL_TITLE,
            news_summaries::SUMMARY,
            news_summaries::CREATED_AT,
        ]
        .join(", ")
    }

    // rows of one load share a timestamp; the id keeps the order stable
    fn newest_first() -> String {
        format!(
            "{} DESC, {} DESC",
            news_summaries::CREATED_AT,
            news_summaries::ID
        )
    }

    fn collect(&self, query: &str, params: impl rusqlite::Params) -> Result<Vec<NewsRecord>> {
        let mut stmt = self.conn.prepare(query)?;
        let records = stmt
            .query_map(params, map_news_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

/// Map a database row to a `NewsRecord`
fn map_news_record(row: &Row) -> rusqlite::Result<NewsRecord> {
    Ok(NewsRecord {
        id: row.get(news_summaries::ID)?,
        original_title: row.get(news_summaries::ORIGINAL_TITLE)?,
        summary: row.get(news_summaries::SUMMARY)?,
        created_at: row.get(news_summaries::CREATED_AT)?,
    })
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Escape `LIKE` wildcards so `term` matches as a plain substring.
#[must_use]
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
