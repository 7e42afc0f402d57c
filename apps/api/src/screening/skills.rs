//! Skill extraction — whole-word vocabulary scan over raw text.
//!
//! Extraction runs on the raw (only lowercased) input, not on normalized
//! text: stop-word removal and lemmatization would mangle exact phrases
//! like "machine learning" or "continuous integration" before the scan.

use std::collections::BTreeSet;

use regex::Regex;

use crate::screening::lexicon::SkillVocabulary;

/// Matches vocabulary terms in documents.
///
/// One pattern per term, `\b<term>\b`, compiled once at construction and
/// matched against the lowercased input (vocabulary terms are stored
/// lowercase, so the scan is case-insensitive end to end).
/// Word boundaries on both ends keep "r" from matching
/// inside "car" and "java" from matching inside "javascript". Terms that
/// end in a non-word character ("c++", "c#") cannot satisfy the trailing
/// boundary against ordinary prose — a known quirk of the boundary rule
/// that is kept as-is.
#[derive(Debug)]
pub struct SkillExtractor {
    patterns: Vec<(String, Regex)>,
}

impl SkillExtractor {
    pub fn new(vocabulary: &SkillVocabulary) -> Result<Self, regex::Error> {
        let mut patterns = Vec::with_capacity(vocabulary.len());
        for term in vocabulary.terms() {
            let pattern = format!(r"\b{}\b", regex::escape(term));
            patterns.push((term.to_string(), Regex::new(&pattern)?));
        }
        Ok(Self { patterns })
    }

    /// Returns the subset of vocabulary terms present in `text`.
    ///
    /// A term is present iff it occurs at least once as a whole word or
    /// whole phrase; occurrence counts are not tracked. Empty input yields
    /// an empty set. Never fails.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        if text.is_empty() {
            return BTreeSet::new();
        }
        let lowered = text.to_lowercase();
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(&lowered))
            .map(|(term, _)| term.clone())
            .collect()
    }
}
