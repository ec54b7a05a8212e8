//! Operational metrics for loads, queries, and evaluations.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding process installs a recorder; without one every call is a no-op.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metric names used across the crate
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    /// Rows written by bulk loads
    pub rows_loaded_total: &'static str,
    /// Bulk loads attempted, labelled by status
    pub loads_total: &'static str,
    /// Queries run, labelled by mode
    pub queries_total: &'static str,
    /// Rows returned by the last query
    pub query_results: &'static str,
    /// Pairs aligned by position before filtering
    pub pairs_aligned_total: &'static str,
    /// Pairs that survived filtering and were scored
    pub pairs_scored_total: &'static str,
    /// Evaluation wall-clock time
    pub evaluation_duration: &'static str,
    /// Per-pair score distribution, labelled by metric
    pub similarity_score: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            rows_loaded_total: "news_eval_rows_loaded_total",
            loads_total: "news_eval_loads_total",
            queries_total: "news_eval_queries_total",
            query_results: "news_eval_query_results",
            pairs_aligned_total: "news_eval_pairs_aligned_total",
            pairs_scored_total: "news_eval_pairs_scored_total",
            evaluation_duration: "news_eval_evaluation_duration_seconds",
            similarity_score: "news_eval_similarity_score",
        }
    }
}

impl MetricsCollector {
    /// Record the outcome of a bulk load
    pub fn record_load(&self, rows: usize, success: bool) {
        let status = if success { "success" } else { "error" };
        counter!(self.loads_total, "status" => status).increment(1);
        if success {
            counter!(self.rows_loaded_total).increment(rows as u64);
        }
    }

    /// Record a query and its result count
    pub fn record_query(&self, mode: &'static str, results: usize) {
        counter!(self.queries_total, "mode" => mode).increment(1);
        gauge!(self.query_results).set(results as f64);
    }

    /// Record the size of an evaluation before and after filtering
    pub fn record_evaluation(&self, aligned: usize, scored: usize, duration: Duration) {
        counter!(self.pairs_aligned_total).increment(aligned as u64);
        counter!(self.pairs_scored_total).increment(scored as u64);
        histogram!(self.evaluation_duration).record(duration.as_secs_f64());
    }

    /// Record one similarity score
    pub fn record_score(&self, metric: &'static str, score: f64) {
        histogram!(self.similarity_score, "metric" => metric).record(score);
    }
}
