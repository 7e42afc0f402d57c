//! TF-IDF cosine similarity over a two-document corpus.
//!
//! The corpus is always exactly {description, candidate}: term statistics
//! are computed over that pair and nothing else, so document frequencies
//! are 1 or 2 and the vocabulary is rebuilt per call. Vectors cover
//! unigrams and bigrams of the normalized token streams, capped at the
//! top-K terms by document frequency (alphabetical tie-break, so the cap
//! is deterministic).
//!
//! Failure policy: the scorer never propagates an error. An input that
//! normalizes to nothing, or a vocabulary that collapses to nothing,
//! degrades to a 0.0 score tagged `Degraded` — one bad document must not
//! abort a batch, but the caller can still tell "failed" apart from
//! "genuinely dissimilar".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::screening::normalizer::TextNormalizer;

/// Default cap on the number of n-gram dimensions.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// How a similarity value came to be.
///
/// `Degraded` marks the recovered-failure path (empty normalized input or
/// an empty n-gram vocabulary). A `Computed` 0.0 means the two texts
/// genuinely share no weighted dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimilarityStatus {
    Computed,
    Degraded,
}

/// A similarity value in [0, 100] plus its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    pub value: f64,
    pub status: SimilarityStatus,
}

impl SimilarityScore {
    fn degraded() -> Self {
        Self {
            value: 0.0,
            status: SimilarityStatus::Degraded,
        }
    }
}

/// Computes the vector-space similarity component of a match.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    normalizer: TextNormalizer,
    max_features: usize,
}

impl SimilarityScorer {
    pub fn new(normalizer: TextNormalizer, max_features: usize) -> Self {
        Self {
            normalizer,
            max_features,
        }
    }

    /// Scores `candidate_text` against `description_text` as a percentage.
    ///
    /// Symmetric in its two arguments (cosine similarity is), and exactly
    /// 100 for two identical non-empty inputs.
    pub fn score(&self, candidate_text: &str, description_text: &str) -> SimilarityScore {
        let candidate = self.normalizer.normalize(candidate_text);
        let description = self.normalizer.normalize(description_text);
        if candidate.is_empty() || description.is_empty() {
            return SimilarityScore::degraded();
        }

        let candidate_counts = ngram_counts(&candidate);
        let description_counts = ngram_counts(&description);

        let vocabulary =
            select_vocabulary(&description_counts, &candidate_counts, self.max_features);
        if vocabulary.is_empty() {
            return SimilarityScore::degraded();
        }

        let description_vec = tfidf_vector(&description_counts, &vocabulary);
        let candidate_vec = tfidf_vector(&candidate_counts, &vocabulary);

        let value = (cosine(&description_vec, &candidate_vec) * 100.0).clamp(0.0, 100.0);
        SimilarityScore {
            value,
            status: SimilarityStatus::Computed,
        }
    }
}

/// Counts unigrams and adjacent-pair bigrams of a normalized token string.
fn ngram_counts(normalized: &str) -> HashMap<String, u32> {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let mut counts = HashMap::with_capacity(tokens.len() * 2);
    for token in &tokens {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

/// Selects up to `max_features` terms by document frequency across the
/// two-document corpus, and pairs each with its smoothed IDF weight:
/// `ln((1 + n) / (1 + df)) + 1` with n = 2.
fn select_vocabulary(
    description_counts: &HashMap<String, u32>,
    candidate_counts: &HashMap<String, u32>,
    max_features: usize,
) -> Vec<(String, f64)> {
    let mut df: HashMap<&str, u32> = HashMap::new();
    for term in description_counts.keys() {
        *df.entry(term.as_str()).or_insert(0) += 1;
    }
    for term in candidate_counts.keys() {
        *df.entry(term.as_str()).or_insert(0) += 1;
    }

    let mut terms: Vec<(&str, u32)> = df.into_iter().collect();
    // Highest document frequency first; alphabetical among equals so the
    // truncation below is deterministic for a given input pair.
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    terms.truncate(max_features);

    terms
        .into_iter()
        .map(|(term, df)| {
            let idf = ((1.0 + 2.0) / (1.0 + f64::from(df))).ln() + 1.0;
            (term.to_string(), idf)
        })
        .collect()
}

/// Builds the dense TF-IDF vector for one document over the shared
/// vocabulary: raw term count × IDF weight per dimension.
fn tfidf_vector(counts: &HashMap<String, u32>, vocabulary: &[(String, f64)]) -> Vec<f64> {
    vocabulary
        .iter()
        .map(|(term, idf)| f64::from(counts.get(term).copied().unwrap_or(0)) * idf)
        .collect()
}

/// Cosine similarity, defined as 0.0 when either vector is zero.
fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_sq_a: f64 = a.iter().map(|x| x * x).sum();
    let norm_sq_b: f64 = b.iter().map(|x| x * x).sum();
    let denom = (norm_sq_a * norm_sq_b).sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
