//! Batch scoring of summaries against their original articles.
//!
//! Two CSV files are read, aligned row by row up to the shorter length,
//! normalized, filtered by length, and scored with the three metrics in
//! [`crate::similarity`].
//!
//! Alignment is purely positional. Nothing checks that row `i` of one file
//! really belongs with row `i` of the other; if either file was filtered or
//! reordered upstream, the scores are meaningless.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::ScorerConfig;
use crate::error::{EvalError, Result};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{ScoreRecord, ScoreSummary, TextPair};
use crate::nlp::{char_len, TextNormalizer};
use crate::reader::read_table;
use crate::similarity::{
    jaccard_similarity, keyword_overlap, tfidf_scores, DEFAULT_MAX_FEATURES, DEFAULT_NGRAM_RANGE,
    DEFAULT_TOP_KEYWORDS,
};

/// Tunable parameters of an evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringOptions {
    /// Minimum normalized original length, in characters
    pub min_original_chars: usize,
    /// Minimum normalized summary length, in characters
    pub min_summary_chars: usize,
    /// TF-IDF vocabulary cap
    pub max_features: usize,
    /// Inclusive n-gram range for TF-IDF terms
    pub ngram_range: (usize, usize),
    /// Keywords compared per side
    pub top_keywords: usize,
    /// Draw progress bars on stderr
    pub show_progress: bool,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            min_original_chars: 10,
            min_summary_chars: 5,
            max_features: DEFAULT_MAX_FEATURES,
            ngram_range: DEFAULT_NGRAM_RANGE,
            top_keywords: DEFAULT_TOP_KEYWORDS,
            show_progress: false,
        }
    }
}

impl From<&ScorerConfig> for ScoringOptions {
    fn from(config: &ScorerConfig) -> Self {
        Self {
            min_original_chars: config.min_original_chars,
            min_summary_chars: config.min_summary_chars,
            max_features: config.max_features,
            ngram_range: (config.ngram_min, config.ngram_max),
            top_keywords: config.top_keywords,
            show_progress: config.show_progress,
        }
    }
}

/// Scores for every surviving pair, in filtered-pair order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    /// Rows in the originals file
    pub originals_rows: usize,
    /// Rows in the summaries file
    pub summaries_rows: usize,
    /// Pairs considered, `min(originals_rows, summaries_rows)`
    pub aligned_pairs: usize,
    /// One record per pair that survived filtering
    pub records: Vec<ScoreRecord>,
}

impl EvaluationReport {
    /// Per-metric means over all records.
    #[must_use]
    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary::from_records(&self.records)
    }
}

/// Runs the normalize, align, filter, score pipeline
#[derive(Debug, Clone)]
pub struct Scorer {
    normalizer: TextNormalizer,
    options: ScoringOptions,
}

impl Scorer {
    /// Create a scorer, rejecting unusable options up front.
    pub fn new(options: ScoringOptions) -> Result<Self> {
        let (min_n, max_n) = options.ngram_range;
        if options.max_features == 0 || min_n == 0 || min_n > max_n {
            return Err(EvalError::InvalidConfig(format!(
                "Invalid TF-IDF settings: max_features={}, ngram_range=({min_n}, {max_n})",
                options.max_features
            )));
        }
        if options.top_keywords == 0 {
            return Err(EvalError::InvalidConfig("top_keywords must be greater than 0".into()));
        }

        Ok(Self {
            normalizer: TextNormalizer::new()?,
            options,
        })
    }

    /// Options this scorer was built with
    #[must_use]
    pub const fn options(&self) -> &ScoringOptions {
        &self.options
    }

    /// Normalize a single pair and apply the length filter.
    #[must_use]
    pub fn prepare_pair(&self, original: &str, summary: &str) -> Option<TextPair> {
        let original = self.normalizer.normalize(original);
        let summary = self.normalizer.normalize(summary);

        // Lengths are taken after the final trim, so a space left behind by a
        // stripped trailing symbol does not count toward the threshold.
        let long_enough = char_len(&original) >= self.options.min_original_chars
            && char_len(&summary) >= self.options.min_summary_chars;
        long_enough.then_some(TextPair { original, summary })
    }

    /// Zip `originals` and `summaries` by position and keep the pairs that
    /// pass the length filter. Rows past the shorter input are ignored.
    #[must_use]
    pub fn align_pairs(&self, originals: &[String], summaries: &[String]) -> Vec<TextPair> {
        let aligned = originals.len().min(summaries.len());
        if originals.len() != summaries.len() {
            warn!(
                originals = originals.len(),
                summaries = summaries.len(),
                aligned,
                "Input lengths differ; extra rows are ignored"
            );
        }

        let progress = stage_progress(aligned, "normalize", self.options.show_progress);
        let pairs = originals
            .iter()
            .zip(summaries)
            .filter_map(|(original, summary)| {
                progress.inc(1);
                self.prepare_pair(original, summary)
            })
            .collect::<Vec<_>>();
        progress.finish_and_clear();

        info!("Prepared {} of {} pairs", pairs.len(), aligned);
        pairs
    }

    /// Score every pair with all three metrics.
    ///
    /// The TF-IDF vocabulary is fitted once over all originals followed by all
    /// summaries.
    pub fn score_pairs(&self, pairs: &[TextPair]) -> Result<Vec<ScoreRecord>> {
        if pairs.is_empty() {
            warn!("No pairs survived filtering");
            return Ok(Vec::new());
        }

        let metrics = MetricsCollector::default();
        let originals: Vec<String> = pairs.iter().map(|p| p.original.clone()).collect();
        let summaries: Vec<String> = pairs.iter().map(|p| p.summary.clone()).collect();

        let tfidf = tfidf_scores(
            &originals,
            &summaries,
            self.options.max_features,
            self.options.ngram_range,
        )?;

        let progress = stage_progress(pairs.len(), "score", self.options.show_progress);
        let records = pairs
            .iter()
            .zip(tfidf)
            .map(|(pair, tfidf_score)| {
                progress.inc(1);
                let record = ScoreRecord {
                    original_text: pair.original.clone(),
                    summary_text: pair.summary.clone(),
                    tfidf_score,
                    jaccard_score: jaccard_similarity(&pair.original, &pair.summary),
                    keyword_score: keyword_overlap(
                        &pair.original,
                        &pair.summary,
                        self.options.top_keywords,
                    ),
                };
                metrics.record_score("tfidf", record.tfidf_score);
                metrics.record_score("jaccard", record.jaccard_score);
                metrics.record_score("keyword", record.keyword_score);
                record
            })
            .collect();
        progress.finish_and_clear();

        Ok(records)
    }

    /// Align, filter, and score two already-loaded text columns.
    pub fn evaluate(&self, originals: &[String], summaries: &[String]) -> Result<EvaluationReport> {
        let timer = OperationTimer::new("evaluate");
        let pairs = self.align_pairs(originals, summaries);
        let records = self.score_pairs(&pairs)?;

        let aligned_pairs = originals.len().min(summaries.len());
        MetricsCollector::default().record_evaluation(aligned_pairs, records.len(), timer.elapsed());
        timer.finish();

        Ok(EvaluationReport {
            originals_rows: originals.len(),
            summaries_rows: summaries.len(),
            aligned_pairs,
            records,
        })
    }

    /// Read the first column of both files and evaluate them.
    ///
    /// Either file failing every encoding aborts the run.
    pub fn evaluate_files(&self, originals_path: &Path, summaries_path: &Path) -> Result<EvaluationReport> {
        let originals = read_table(originals_path)?.table.first_column();
        let summaries = read_table(summaries_path)?.table.first_column();
        info!(
            originals = originals.len(),
            summaries = summaries.len(),
            "Loaded evaluation inputs"
        );

        self.evaluate(&originals, &summaries)
    }

    /// Score one pair without the length filter.
    ///
    /// The vectorizer is fitted on just these two documents.
    pub fn compare(&self, original: &str, summary: &str) -> Result<ScoreRecord> {
        let pair = TextPair {
            original: self.normalizer.normalize(original),
            summary: self.normalizer.normalize(summary),
        };
        let mut records = self.score_pairs(std::slice::from_ref(&pair))?;
        records
            .pop()
            .ok_or_else(|| EvalError::InvalidInput("Nothing to compare".into()))
    }
}

fn stage_progress(len: usize, stage: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg:>10} [{bar:30.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        progress.set_style(style.progress_chars("█▓░"));
    }
    progress.set_message(stage);
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> Scorer {
        Scorer::new(ScoringOptions::default()).unwrap()
    }

    #[test]
    fn test_short_original_is_filtered() {
        assert!(scorer().prepare_pair("hi", "a long enough summary").is_none());
    }

    #[test]
    fn test_short_summary_is_filtered() {
        assert!(scorer().prepare_pair("an original that is long", "abc").is_none());
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let pair = scorer().prepare_pair("0123456789", "abcde").unwrap();
        assert_eq!(pair.original, "0123456789");
        assert_eq!(pair.summary, "abcde");
    }

    #[test]
    fn test_rejects_bad_options() {
        let options = ScoringOptions {
            top_keywords: 0,
            ..ScoringOptions::default()
        };
        assert!(Scorer::new(options).is_err());
    }

    #[test]
    fn test_compare_ignores_length_filter() {
        let record = scorer().compare("a b", "b a!").unwrap();
        assert_eq!(record.jaccard_score, 1.0);
        assert_eq!(record.keyword_score, 1.0);
        // single-character tokens never enter the TF-IDF vocabulary
        assert_eq!(record.tfidf_score, 0.0);
    }
}
