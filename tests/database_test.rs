use std::fs;
use std::path::Path;

use news_summary_eval::db::Database;
use news_summary_eval::error::EvalError;
use news_summary_eval::loader::{load_news_csv, query_news, ColumnMapping, QueryOutcome};
use news_summary_eval::schema::news_summaries;
use rusqlite::params;
use tempfile::tempdir;

const NEWS_CSV: &str = "원본_제목,요약,카테고리\n\
정치권 예산안 합의,여야가 정치 협상 끝에 예산안에 합의했다,정치\n\
반도체 수출 증가,반도체 수출이 석 달 연속 늘었다,경제\n\
국회 정치 개혁 논의,선거제 개편을 두고 논의가 이어졌다,정치\n";

fn write_csv(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write CSV");
    path
}

fn records(outcome: QueryOutcome) -> Vec<news_summary_eval::NewsRecord> {
    match outcome {
        QueryOutcome::Records(records) => records,
        QueryOutcome::StoreAbsent(path) => panic!("store unexpectedly absent: {}", path.display()),
    }
}

#[test]
fn test_load_creates_table_and_indexes() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let csv_path = write_csv(temp_dir.path(), "news.csv", NEWS_CSV);
    let db_path = temp_dir.path().join("news.db");

    let report = load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 3)
        .expect("Failed to load CSV");

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.stored_rows, 3);
    assert_eq!(report.renamed_headers, vec!["original_title", "summary", "카테고리"]);
    assert_eq!(report.preview.len(), 3);
    assert_eq!(report.preview[0].original_title, "정치권 예산안 합의");

    let db = Database::open(&db_path).expect("Failed to open database");
    assert_eq!(
        db.index_names().expect("Failed to list indexes"),
        vec![news_summaries::CREATED_AT_INDEX, news_summaries::TITLE_INDEX]
    );
}

#[test]
fn test_reload_replaces_previous_contents() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let csv_path = write_csv(temp_dir.path(), "news.csv", NEWS_CSV);
    let db_path = temp_dir.path().join("news.db");

    load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).expect("First load failed");
    load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).expect("Second load failed");

    let db = Database::open(&db_path).expect("Failed to open database");
    assert_eq!(db.count().expect("Failed to count"), 3);
}

#[test]
fn test_unreadable_source_leaves_store_untouched() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("news.db");
    let csv_path = write_csv(temp_dir.path(), "news.csv", NEWS_CSV);
    load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).expect("Initial load failed");

    // 0xFF is neither valid UTF-8 nor an EUC-KR lead byte
    let broken = temp_dir.path().join("broken.csv");
    fs::write(&broken, b"\xFF\xFE,\xFF\n\xFF,\xFF\n").expect("Failed to write CSV");
    let err = load_news_csv(&broken, &db_path, &ColumnMapping::default(), 0).unwrap_err();
    match err {
        EvalError::SourceUnreadable { attempts, .. } => assert_eq!(attempts.len(), 4),
        other => panic!("unexpected error: {other}"),
    }

    let db = Database::open(&db_path).expect("Failed to open database");
    assert_eq!(db.count().expect("Failed to count"), 3);
}

#[test]
fn test_short_row_fails_insert_instead_of_parse() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let csv_path = write_csv(
        temp_dir.path(),
        "news.csv",
        "원본_제목,요약\n첫 번째 제목,첫 번째 요약\n제목만\n",
    );
    let db_path = temp_dir.path().join("news.db");

    let err = load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).unwrap_err();
    match err {
        EvalError::InsertFailed { row, .. } => assert_eq!(row, 2),
        other => panic!("unexpected error: {other}"),
    }

    let db = Database::open(&db_path).expect("Failed to open database");
    assert_eq!(db.count().expect("Failed to count"), 0);
}

#[test]
fn test_missing_columns_abort_before_store_is_created() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let csv_path = write_csv(temp_dir.path(), "news.csv", "title,body\n제목,본문\n");
    let db_path = temp_dir.path().join("news.db");

    let err = load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).unwrap_err();
    assert!(matches!(err, EvalError::MissingColumns { .. }));
    assert!(!db_path.exists());
}

#[test]
fn test_insert_failure_rolls_back() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let csv_path = write_csv(
        temp_dir.path(),
        "news.csv",
        "원본_제목,요약\n첫 번째 제목,첫 번째 요약\n두 번째 제목,\n",
    );
    let db_path = temp_dir.path().join("news.db");

    let err = load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).unwrap_err();
    match err {
        EvalError::InsertFailed { row, .. } => assert_eq!(row, 2),
        other => panic!("unexpected error: {other}"),
    }

    // the recreated table survives, empty
    let db = Database::open(&db_path).expect("Failed to open database");
    assert_eq!(db.count().expect("Failed to count"), 0);
}

#[test]
fn test_search_returns_matches_newest_first() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let csv_path = write_csv(temp_dir.path(), "news.csv", NEWS_CSV);
    let db_path = temp_dir.path().join("news.db");
    load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).expect("Failed to load CSV");

    {
        let db = Database::open(&db_path).expect("Failed to open database");
        let stamps = [(1, "2025-01-03 09:00:00"), (2, "2025-01-02 09:00:00"), (3, "2025-01-01 09:00:00")];
        for (id, stamp) in stamps {
            db.connection()
                .execute(
                    "UPDATE news_summaries SET created_at = ?1 WHERE id = ?2",
                    params![stamp, id],
                )
                .expect("Failed to set timestamp");
        }
    }

    let found = records(query_news(&db_path, Some("정치"), 10).expect("Query failed"));
    let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
    for record in &found {
        assert!(record.original_title.contains("정치") || record.summary.contains("정치"));
    }
}

#[test]
fn test_query_without_term_returns_latest() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut csv = String::from("원본_제목,요약\n");
    for i in 0..15 {
        csv.push_str(&format!("제목 {i},요약 {i}\n"));
    }
    let csv_path = write_csv(temp_dir.path(), "news.csv", &csv);
    let db_path = temp_dir.path().join("news.db");
    load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).expect("Failed to load CSV");

    let latest = records(query_news(&db_path, None, 10).expect("Query failed"));
    assert_eq!(latest.len(), 10);
    assert_eq!(latest[0].id, 15);
    assert_eq!(latest[9].id, 6);

    // an empty term behaves like no term
    let latest = records(query_news(&db_path, Some(""), 10).expect("Query failed"));
    assert_eq!(latest.len(), 10);
}

#[test]
fn test_query_reports_missing_store() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("absent.db");

    let outcome = query_news(&db_path, Some("정치"), 10).expect("Query failed");
    assert_eq!(outcome, QueryOutcome::StoreAbsent(db_path.clone()));
    assert!(!db_path.exists());
}

#[test]
fn test_search_without_matches_is_empty() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let csv_path = write_csv(temp_dir.path(), "news.csv", NEWS_CSV);
    let db_path = temp_dir.path().join("news.db");
    load_news_csv(&csv_path, &db_path, &ColumnMapping::default(), 0).expect("Failed to load CSV");

    let found = records(query_news(&db_path, Some("스포츠"), 10).expect("Query failed"));
    assert!(found.is_empty());
}
