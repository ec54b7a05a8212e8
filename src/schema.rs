//! Database schema definitions
//!
//! Table, column, and index names for the news summary store, plus the DDL
//! that creates them. Queries are assembled from these constants so the names
//! live in one place.

/// News summaries table schema
pub mod news_summaries {
    /// Table name
    pub const TABLE: &str = "news_summaries";
    /// Primary key column
    pub const ID: &str = "id";
    /// Original article title column
    pub const ORIGINAL_TITLE: &str = "original_title";
    /// Generated summary column
    pub const SUMMARY: &str = "summary";
    /// Insertion timestamp column
    pub const CREATED_AT: &str = "created_at";
    /// Last-update timestamp column (never changed after insert)
    pub const UPDATED_AT: &str = "updated_at";

    /// Lookup index on the title column
    pub const TITLE_INDEX: &str = "idx_original_title";
    /// Recency index on the creation timestamp
    pub const CREATED_AT_INDEX: &str = "idx_created_at";
}

/// Drop statement run before every load.
#[must_use]
pub fn drop_table_sql() -> String {
    format!("DROP TABLE IF EXISTS {}", news_summaries::TABLE)
}

/// `CREATE TABLE` statement for `news_summaries`.
#[must_use]
pub fn create_table_sql() -> String {
    use news_summaries::{CREATED_AT, ID, ORIGINAL_TITLE, SUMMARY, TABLE, UPDATED_AT};
    format!(
        "CREATE TABLE {TABLE} (
            {ID} INTEGER PRIMARY KEY AUTOINCREMENT,
            {ORIGINAL_TITLE} TEXT NOT NULL,
            {SUMMARY} TEXT NOT NULL,
            {CREATED_AT} TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            {UPDATED_AT} TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )"
    )
}

/// Both lookup indexes, created after the bulk insert.
#[must_use]
pub fn create_indexes_sql() -> String {
    use news_summaries::{CREATED_AT, CREATED_AT_INDEX, ORIGINAL_TITLE, TABLE, TITLE_INDEX};
    format!(
        "CREATE INDEX {TITLE_INDEX} ON {TABLE}({ORIGINAL_TITLE});
         CREATE INDEX {CREATED_AT_INDEX} ON {TABLE}({CREATED_AT});"
    )
}
