use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use news_summary_eval::config::AppConfig;
use news_summary_eval::loader::{self, ColumnMapping, QueryOutcome};
use news_summary_eval::logging::init_logging;
use news_summary_eval::models::{NewsRecord, ReportFormat};
use news_summary_eval::report::{render_summary, write_report};
use news_summary_eval::scorer::{Scorer, ScoringOptions};
use news_summary_eval::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file, layered over the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the store contents with a CSV of titles and summaries
    Load {
        /// Source CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Store file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Skip the follow-up query of the newest records
        #[arg(long)]
        no_query: bool,
    },
    /// Search the store, or list the newest records
    Query {
        /// Store file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Substring to look for in titles and summaries
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Score summaries against their original articles
    Score {
        /// CSV whose first column holds the original articles
        #[arg(long)]
        originals: Option<PathBuf>,

        /// CSV whose first column holds the summaries
        #[arg(long)]
        summaries: Option<PathBuf>,

        /// Directory for the report file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Report format (csv or json)
        #[arg(short, long)]
        format: Option<String>,

        /// Hide progress bars
        #[arg(long)]
        no_progress: bool,
    },
    /// Score a single original/summary pair
    Compare {
        /// Original article text
        #[arg(long)]
        original: String,

        /// Summary text
        #[arg(long)]
        summary: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
        config.validate()?;
    }

    // Initialize logging
    let log_file = config.logging.file_path.as_deref().map(Path::new);
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.format == "json",
        log_file,
    )?;

    info!("Starting news-summary-eval");

    match cli.command {
        Commands::Load { csv, db, no_query } => load_store(&config, csv, db, no_query),
        Commands::Query { db, search } => query_store(&config, db, search.as_deref()),
        Commands::Score {
            originals,
            summaries,
            output_dir,
            format,
            no_progress,
        } => score_files(&config, originals, summaries, output_dir, format.as_deref(), no_progress),
        Commands::Compare { original, summary } => compare_pair(&config, &original, &summary),
    }
}

/// Load the CSV into the store, then show the newest records
fn load_store(config: &AppConfig, csv: Option<PathBuf>, db: Option<PathBuf>, no_query: bool) -> Result<()> {
    let csv_path = csv.unwrap_or_else(|| PathBuf::from(&config.loader.source_path));
    let db_path = db.unwrap_or_else(|| PathBuf::from(&config.store.path));

    if !csv_path.exists() {
        println!("CSV file not found: {}", csv_path.display());
        let dir = csv_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let candidates = loader::list_csv_candidates(dir)?;
        if !candidates.is_empty() {
            println!("Use one of the following files:");
            for candidate in candidates {
                println!("  - {}", candidate.display());
            }
        }
        return Ok(());
    }
    InputValidator::validate_source_file(&csv_path)?;

    let report = loader::load_news_csv(
        &csv_path,
        &db_path,
        &ColumnMapping::default(),
        config.loader.preview_rows,
    )
    .with_context(|| format!("Failed to load {}", csv_path.display()))?;

    println!("CSV loaded: {} rows ({})", report.rows_read, report.encoding.label());
    println!("Columns: {:?}", report.source_headers);
    println!("Renamed columns: {:?}", report.renamed_headers);
    println!("Total stored records: {}", report.stored_rows);

    if !report.preview.is_empty() {
        println!("\nSample data:");
        for record in &report.preview {
            println!("ID: {}", record.id);
            println!("Title: {}...", loader::truncate_chars(&record.original_title, config.loader.preview_chars));
            println!("Summary: {}...", loader::truncate_chars(&record.summary, config.loader.preview_chars));
            println!("{}", "-".repeat(50));
        }
    }
    println!("\nStore written: {}", db_path.display());

    if !no_query {
        println!("\n{}", "=".repeat(50));
        query_store(config, Some(db_path), None)?;
    }

    Ok(())
}

/// Run a search or latest-records query and print the results
fn query_store(config: &AppConfig, db: Option<PathBuf>, search: Option<&str>) -> Result<()> {
    let db_path = db.unwrap_or_else(|| PathBuf::from(&config.store.path));
    if let Some(term) = search {
        InputValidator::validate_search_term(term)?;
    }

    match loader::query_news(&db_path, search, config.store.query_limit)? {
        QueryOutcome::StoreAbsent(path) => {
            println!("Store file does not exist: {}", path.display());
        }
        QueryOutcome::Records(records) if records.is_empty() => {
            println!("No results.");
        }
        QueryOutcome::Records(records) => print_records(&records),
    }

    Ok(())
}

fn print_records(records: &[NewsRecord]) {
    println!("\nResults: {}", records.len());
    println!("{}", "=".repeat(80));
    for record in records {
        println!("ID: {}", record.id);
        println!("Title: {}", record.original_title);
        println!("Summary: {}", record.summary);
        println!("Created: {}", record.created_at);
        println!("{}", "-".repeat(80));
    }
}

/// Score the two configured files and write the report
fn score_files(
    config: &AppConfig,
    originals: Option<PathBuf>,
    summaries: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    format: Option<&str>,
    no_progress: bool,
) -> Result<()> {
    let originals_path = originals.unwrap_or_else(|| PathBuf::from(&config.scorer.originals_path));
    let summaries_path = summaries.unwrap_or_else(|| PathBuf::from(&config.scorer.summaries_path));
    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.scorer.output_dir));
    let report_format = match format {
        Some(name) => ReportFormat::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("Invalid format: {}. Use csv or json.", name))?,
        None => config.report_format(),
    };

    InputValidator::validate_source_file(&originals_path)?;
    InputValidator::validate_source_file(&summaries_path)?;
    InputValidator::validate_output_dir(&output_dir)?;

    let mut options = ScoringOptions::from(&config.scorer);
    if no_progress {
        options.show_progress = false;
    }
    let scorer = Scorer::new(options)?;

    let evaluation = scorer
        .evaluate_files(&originals_path, &summaries_path)
        .context("Evaluation failed")?;
    println!(
        "Inputs: {} originals, {} summaries, {} aligned",
        evaluation.originals_rows, evaluation.summaries_rows, evaluation.aligned_pairs
    );
    if evaluation.records.is_empty() {
        warn!("No pairs passed the length filter");
    }

    let path = write_report(
        &evaluation.records,
        report_format,
        &output_dir,
        &config.scorer.output_prefix,
        Local::now(),
    )?;
    println!("Report saved: {}", path.display());

    print!(
        "{}",
        render_summary(&evaluation.records, config.scorer.sample_rows, config.scorer.preview_chars)
    );
    Ok(())
}

/// Score one pair given on the command line
fn compare_pair(config: &AppConfig, original: &str, summary: &str) -> Result<()> {
    let scorer = Scorer::new(ScoringOptions::from(&config.scorer))?;
    let record = scorer.compare(original, summary)?;

    println!("Original: {}", record.original_text);
    println!("Summary: {}", record.summary_text);
    println!(
        "TF-IDF: {:.4}, Jaccard: {:.4}, Keyword: {:.4}",
        record.tfidf_score, record.jaccard_score, record.keyword_score
    );
    Ok(())
}
