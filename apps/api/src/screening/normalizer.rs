//! Text normalization — the shared preprocessing step behind the
//! similarity scorer.
//!
//! The pipeline order is load-bearing: stop-word and length filtering see
//! the surface token, lemmatization sees only survivors. Skill extraction
//! deliberately does NOT go through this pipeline (it scans raw text so
//! exact vocabulary phrases stay intact).

use crate::screening::lexicon::{LemmaDictionary, StopWords};

/// Normalizes free text into a canonical space-separated token string.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: StopWords,
    lemmas: LemmaDictionary,
}

impl TextNormalizer {
    pub fn new(stop_words: StopWords, lemmas: LemmaDictionary) -> Self {
        Self { stop_words, lemmas }
    }

    /// Applies the full pipeline:
    ///
    /// 1. lowercase;
    /// 2. replace every character that is not an ASCII letter or whitespace
    ///    with a space (digits and punctuation fragment, they do not
    ///    collapse — "c++" becomes "c");
    /// 3. split on whitespace;
    /// 4. drop stop words and tokens of length <= 2;
    /// 5. resolve each survivor through the lemma dictionary;
    /// 6. re-join with single spaces.
    ///
    /// Deterministic for a given input and lexicon version; idempotent
    /// because lemma base forms survive steps 1–5 unchanged.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped: String = lowered
            .chars()
            .map(|c| {
                if c.is_ascii_alphabetic() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        stripped
            .split_whitespace()
            .filter(|token| token.len() > 2 && !self.stop_words.contains(token))
            .map(|token| self.lemmas.lemma(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
