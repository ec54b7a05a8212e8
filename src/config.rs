use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::loader::DEFAULT_QUERY_LIMIT;
use crate::models::ReportFormat;
use crate::similarity::{DEFAULT_MAX_FEATURES, DEFAULT_NGRAM_RANGE, DEFAULT_TOP_KEYWORDS};

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite store settings
    pub store: StoreConfig,
    /// CSV loader settings
    pub loader: LoaderConfig,
    /// Similarity scorer settings
    pub scorer: ScorerConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// SQLite store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the store file
    pub path: String,
    /// Rows returned by an unfiltered query
    pub query_limit: usize,
}

/// CSV loader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// CSV file loaded into the store
    pub source_path: String,
    /// Stored rows echoed after a load
    pub preview_rows: usize,
    /// Characters of title/summary shown in previews
    pub preview_chars: usize,
}

/// Similarity scorer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// CSV whose first column holds the original articles
    pub originals_path: String,
    /// CSV whose first column holds the summaries
    pub summaries_path: String,
    /// Minimum normalized original length, in characters
    pub min_original_chars: usize,
    /// Minimum normalized summary length, in characters
    pub min_summary_chars: usize,
    /// TF-IDF vocabulary cap
    pub max_features: usize,
    /// Smallest n-gram size
    pub ngram_min: usize,
    /// Largest n-gram size
    pub ngram_max: usize,
    /// Keywords compared per side
    pub top_keywords: usize,
    /// Directory for report files
    pub output_dir: String,
    /// Report file name prefix
    pub output_prefix: String,
    /// Report format, "csv" or "json"
    pub output_format: String,
    /// Sample rows printed after scoring
    pub sample_rows: usize,
    /// Characters of text shown per sample
    pub preview_chars: usize,
    /// Draw progress bars
    pub show_progress: bool,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level filter used when `RUST_LOG` is unset
    pub level: String,
    /// Optional log file, rotated daily
    pub file_path: Option<String>,
    /// Console format, "text" or "json"
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                path: "news_summaries.db".to_string(),
                query_limit: DEFAULT_QUERY_LIMIT,
            },
            loader: LoaderConfig {
                source_path: "news_summaries.csv".to_string(),
                preview_rows: 3,
                preview_chars: 50,
            },
            scorer: ScorerConfig {
                originals_path: "data/crawling_origin.csv".to_string(),
                summaries_path: "data/crawling_origin_with_summary.csv".to_string(),
                min_original_chars: 10,
                min_summary_chars: 5,
                max_features: DEFAULT_MAX_FEATURES,
                ngram_min: DEFAULT_NGRAM_RANGE.0,
                ngram_max: DEFAULT_NGRAM_RANGE.1,
                top_keywords: DEFAULT_TOP_KEYWORDS,
                output_dir: ".".to_string(),
                output_prefix: "kobert_eval_easy".to_string(),
                output_format: "csv".to_string(),
                sample_rows: 3,
                preview_chars: 50,
                show_progress: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default`, `config/local`, `config`, then
    /// `extra_file` if given, then `NEWS_EVAL_`-prefixed environment variables
    /// (`NEWS_EVAL_SCORER__MAX_FEATURES=300`).
    pub fn load(extra_file: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| anyhow::anyhow!("Failed to build default configuration: {}", e))?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("NEWS_EVAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.store.path.trim().is_empty() {
            return Err(anyhow::anyhow!("store.path must not be empty"));
        }
        if self.store.query_limit == 0 {
            return Err(anyhow::anyhow!("query_limit must be greater than 0"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        if self.scorer.max_features == 0 {
            return Err(anyhow::anyhow!("max_features must be greater than 0"));
        }
        if self.scorer.ngram_min == 0 || self.scorer.ngram_min > self.scorer.ngram_max {
            return Err(anyhow::anyhow!(
                "Invalid n-gram range: ({}, {})",
                self.scorer.ngram_min,
                self.scorer.ngram_max
            ));
        }
        if self.scorer.top_keywords == 0 {
            return Err(anyhow::anyhow!("top_keywords must be greater than 0"));
        }

        if ReportFormat::from_name(&self.scorer.output_format).is_none() {
            return Err(anyhow::anyhow!(
                "Invalid report format: {}. Must be one of: [\"csv\", \"json\"]",
                self.scorer.output_format
            ));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Report format named by `scorer.output_format`
    #[must_use]
    pub fn report_format(&self) -> ReportFormat {
        ReportFormat::from_name(&self.scorer.output_format).unwrap_or(ReportFormat::Csv)
    }
}
