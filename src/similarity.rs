//! Lexical similarity metrics between an original article and its summary.
//!
//! Three independent scores, each in `[0, 1]`:
//!
//! - TF-IDF cosine similarity over a vocabulary fitted on the whole corpus
//! - Jaccard similarity of whitespace token sets
//! - Overlap of the most frequent tokens on each side

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::debug;

use crate::error::{EvalError, Result};
use crate::nlp::tokenize;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 500;
/// Default n-gram range: unigrams and bigrams.
pub const DEFAULT_NGRAM_RANGE: (usize, usize) = (1, 2);
/// Default number of keywords compared per side.
pub const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Sparse L2-normalized TF-IDF row as `(feature index, weight)`, sorted by index
pub type SparseVector = Vec<(usize, f64)>;

/// TF-IDF vectorizer with a capped unigram/bigram vocabulary
///
/// Documents are lowercased and split into tokens of two or more word
/// characters. The vocabulary keeps the `max_features` terms with the highest
/// corpus-wide counts; weights are raw counts times the smoothed inverse
/// document frequency `ln((1 + n) / (1 + df)) + 1`, and each row is
/// L2-normalized.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
    token_regex: Regex,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(max_features: usize, ngram_range: (usize, usize)) -> Result<Self> {
        let (min_n, max_n) = ngram_range;
        if max_features == 0 {
            return Err(EvalError::InvalidConfig("max_features must be greater than 0".into()));
        }
        if min_n == 0 || min_n > max_n {
            return Err(EvalError::InvalidConfig(format!(
                "Invalid n-gram range: ({min_n}, {max_n})"
            )));
        }

        let token_regex = Regex::new(r"\b\w\w+\b")
            .map_err(|e| EvalError::InvalidConfig(format!("Failed to compile token regex: {e}")))?;

        Ok(Self {
            max_features,
            ngram_range,
            token_regex,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        })
    }

    /// Number of features kept after fitting.
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Lowercase, tokenize, and expand `doc` into its n-grams.
    #[must_use]
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let lowered = doc.to_lowercase();
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
        }
        terms
    }

    /// Learn the vocabulary and idf weights from `docs`.
    pub fn fit(&mut self, docs: &[String]) {
        let mut totals: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let terms = self.analyze(doc);
            let mut seen = HashSet::new();
            for term in terms {
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
                *totals.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n_docs = docs.len() as f64;
        self.idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();
    }

    /// TF-IDF row for `doc` over the fitted vocabulary.
    #[must_use]
    pub fn transform(&self, doc: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(doc) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();
        row.sort_by_key(|&(index, _)| index);

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut row {
                *weight /= norm;
            }
        }
        row
    }

    /// Fit on `docs` and return one row per document.
    pub fn fit_transform(&mut self, docs: &[String]) -> Vec<SparseVector> {
        self.fit(docs);
        docs.iter().map(|doc| self.transform(doc)).collect()
    }
}

/// Cosine similarity of two sparse rows, clamped to `[0, 1]`.
///
/// A zero vector on either side scores 0.
#[must_use]
pub fn cosine_similarity(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let norm = |v: &[(usize, f64)]| v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    let (norm_a, norm_b) = (norm(a), norm(b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// TF-IDF cosine score for every aligned pair.
///
/// The vectorizer is fitted once over all originals followed by all
/// summaries, so both sides share one vector space. An empty corpus or an
/// empty vocabulary yields 0 for every pair.
pub fn tfidf_scores(
    originals: &[String],
    summaries: &[String],
    max_features: usize,
    ngram_range: (usize, usize),
) -> Result<Vec<f64>> {
    if originals.len() != summaries.len() {
        return Err(EvalError::InvalidInput(format!(
            "{} originals but {} summaries",
            originals.len(),
            summaries.len()
        )));
    }

    let mut vectorizer = TfidfVectorizer::new(max_features, ngram_range)?;
    let corpus: Vec<String> = originals.iter().chain(summaries).cloned().collect();
    let rows = vectorizer.fit_transform(&corpus);
    debug!(
        documents = corpus.len(),
        features = vectorizer.vocabulary_len(),
        "TF-IDF vocabulary fitted"
    );

    let (original_rows, summary_rows) = rows.split_at(originals.len());
    Ok(original_rows
        .iter()
        .zip(summary_rows)
        .map(|(a, b)| cosine_similarity(a, b))
        .collect())
}

/// Ratio of shared to total distinct items.
///
/// Two empty sets are identical (1.0); exactly one empty set shares nothing
/// (0.0).
#[must_use]
pub fn set_overlap(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let intersection = a.intersection(b).count();
            let union = a.union(b).count();
            intersection as f64 / union as f64
        }
    }
}

/// Jaccard similarity of the whitespace token sets of `a` and `b`.
#[must_use]
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_words: HashSet<&str> = tokenize(a).into_iter().collect();
    let b_words: HashSet<&str> = tokenize(b).into_iter().collect();
    set_overlap(&a_words, &b_words)
}

/// The `n` most frequent distinct tokens of `text`.
///
/// Ties keep first-occurrence order, so the result is deterministic.
#[must_use]
pub fn top_keywords(text: &str, n: usize) -> Vec<&str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for token in tokenize(text) {
        if let Some(&pos) = positions.get(token) {
            counts[pos].1 += 1;
        } else {
            positions.insert(token, counts.len());
            counts.push((token, 1));
        }
    }

    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(n).map(|(token, _)| token).collect()
}

/// Overlap of the `top_n` most frequent tokens on each side.
#[must_use]
pub fn keyword_overlap(a: &str, b: &str, top_n: usize) -> f64 {
    let a_top: HashSet<&str> = top_keywords(a, top_n).into_iter().collect();
    let b_top: HashSet<&str> = top_keywords(b, top_n).into_iter().collect();
    set_overlap(&a_top, &b_top)
}
