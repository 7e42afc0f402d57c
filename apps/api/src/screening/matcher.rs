//! Match aggregation — combines skill coverage and vector similarity into
//! a single explainable report, and ranks candidate batches.
//!
//! `Screener` is the engine's one public entry point. It is immutable
//! after construction and safe to share across threads behind an `Arc`:
//! every call is a pure function of its two input strings and the loaded
//! lexicons.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::screening::lexicon::{LemmaDictionary, SkillVocabulary, StopWords};
use crate::screening::normalizer::TextNormalizer;
use crate::screening::similarity::{
    SimilarityScorer, SimilarityStatus, DEFAULT_MAX_FEATURES,
};
use crate::screening::skills::SkillExtractor;

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

/// Recommendation tier derived from the overall score.
///
/// Thresholds are closed on the lower bound: a candidate at exactly 70.0
/// is `HighlyRecommended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    HighlyRecommended,
    Recommended,
    Maybe,
    NotRecommended,
}

impl Recommendation {
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score >= 70.0 {
            Recommendation::HighlyRecommended
        } else if overall_score >= 55.0 {
            Recommendation::Recommended
        } else if overall_score >= 35.0 {
            Recommendation::Maybe
        } else {
            Recommendation::NotRecommended
        }
    }

    /// Human-readable label for UI surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => "Highly Recommended - Strong match",
            Recommendation::Recommended => "Recommended - Good match",
            Recommendation::Maybe => "Maybe - Moderate match",
            Recommendation::NotRecommended => "Not Recommended - Weak match",
        }
    }
}

/// Weights for combining the two score components. Must sum to 1 for the
/// overall score to stay in [0, 100]; the default is an even split.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub similarity: f64,
    pub skills: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            similarity: 0.5,
            skills: 0.5,
        }
    }
}

/// Full match report for one candidate against one description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Weighted composite of the two components, in [0, 100].
    pub overall_score: f64,
    /// TF-IDF cosine similarity component, in [0, 100].
    pub similarity_score: f64,
    /// Skill-coverage component, in [0, 100].
    ///
    /// ASYMMETRIC by design: this is the share of *description* skills the
    /// candidate covers, not a Jaccard overlap. A candidate listing fifty
    /// extra skills gains nothing here, and the score is not capped by the
    /// candidate's own skill count.
    pub skill_match_score: f64,
    /// Skills present in both texts.
    pub matched_skills: BTreeSet<String>,
    /// Description skills the candidate lacks.
    pub missing_skills: BTreeSet<String>,
    pub candidate_skill_count: usize,
    pub description_skill_count: usize,
    pub recommendation: Recommendation,
    /// Whether the similarity component was actually computed or degraded
    /// to zero after a recovered failure. A `Degraded` zero and a genuine
    /// zero are different facts; callers get to see which one happened.
    pub similarity_status: SimilarityStatus,
}

/// One entry of a ranked batch.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub id: String,
    pub result: MatchResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// The matching engine: skill extraction + similarity scoring + weighted
/// aggregation.
#[derive(Debug)]
pub struct Screener {
    extractor: SkillExtractor,
    scorer: SimilarityScorer,
    weights: ScoringWeights,
}

impl Screener {
    /// Builds an engine with default weights and feature cap.
    pub fn new(
        vocabulary: SkillVocabulary,
        stop_words: StopWords,
        lemmas: LemmaDictionary,
    ) -> Result<Self, regex::Error> {
        Self::with_config(
            vocabulary,
            stop_words,
            lemmas,
            ScoringWeights::default(),
            DEFAULT_MAX_FEATURES,
        )
    }

    pub fn with_config(
        vocabulary: SkillVocabulary,
        stop_words: StopWords,
        lemmas: LemmaDictionary,
        weights: ScoringWeights,
        max_features: usize,
    ) -> Result<Self, regex::Error> {
        let extractor = SkillExtractor::new(&vocabulary)?;
        let normalizer = TextNormalizer::new(stop_words, lemmas);
        Ok(Self {
            extractor,
            scorer: SimilarityScorer::new(normalizer, max_features),
            weights,
        })
    }

    /// Scores one candidate against one description.
    ///
    /// Never fails: empty or pathological inputs produce zero-score
    /// results, not errors (one bad document must not abort a batch).
    pub fn calculate_match(&self, candidate_text: &str, description_text: &str) -> MatchResult {
        let candidate_skills = self.extractor.extract(candidate_text);
        let description_skills = self.extractor.extract(description_text);

        let similarity = self.scorer.score(candidate_text, description_text);

        let matched_skills: BTreeSet<String> = candidate_skills
            .intersection(&description_skills)
            .cloned()
            .collect();
        let missing_skills: BTreeSet<String> = description_skills
            .difference(&candidate_skills)
            .cloned()
            .collect();

        // Coverage of the description's skills only — see the field doc.
        let skill_match_score = if description_skills.is_empty() {
            0.0
        } else {
            100.0 * matched_skills.len() as f64 / description_skills.len() as f64
        };

        let overall_score = (self.weights.similarity * similarity.value
            + self.weights.skills * skill_match_score)
            .clamp(0.0, 100.0);

        MatchResult {
            overall_score,
            similarity_score: similarity.value,
            skill_match_score,
            candidate_skill_count: candidate_skills.len(),
            description_skill_count: description_skills.len(),
            matched_skills,
            missing_skills,
            recommendation: Recommendation::from_score(overall_score),
            similarity_status: similarity.status,
        }
    }

    /// Scores every `(id, text)` candidate against one description and
    /// returns them sorted by overall score, highest first.
    ///
    /// Ordering contract: the sort is stable — candidates with equal
    /// overall scores keep their input order. Callers that care about tie
    /// order must therefore pass candidates as an ordered sequence, which
    /// is why this takes a slice of pairs and not a map.
    pub fn rank(&self, candidates: &[(String, String)], description_text: &str) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .map(|(id, text)| RankedCandidate {
                id: id.clone(),
                result: self.calculate_match(text, description_text),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.result
                .overall_score
                .partial_cmp(&a.result.overall_score)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screener(terms: &[&str]) -> Screener {
        Screener::new(
            SkillVocabulary::from_terms("test", terms),
            StopWords::load(None).unwrap(),
            LemmaDictionary::load(None).unwrap(),
        )
        .unwrap()
    }

    fn default_screener() -> Screener {
        Screener::new(
            SkillVocabulary::load(None).unwrap(),
            StopWords::load(None).unwrap(),
            LemmaDictionary::load(None).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_skill_ratio_is_description_coverage_not_jaccard() {
        let s = screener(&["python", "sql", "aws"]);
        let result = s.calculate_match("Python, SQL", "Python, SQL, AWS");
        assert!((result.skill_match_score - 100.0 * 2.0 / 3.0).abs() < 1e-9);

        // Swapping the roles changes the ratio: the candidate now covers
        // all two description skills despite missing nothing of its own.
        let swapped = s.calculate_match("Python, SQL, AWS", "Python, SQL");
        assert_eq!(swapped.skill_match_score, 100.0);
    }

    #[test]
    fn test_matched_and_missing_partition_description_skills() {
        let s = screener(&["python", "sql", "aws", "docker"]);
        let result = s.calculate_match(
            "Python and Docker in production",
            "Python, SQL and AWS required",
        );
        let union: BTreeSet<String> = result
            .matched_skills
            .union(&result.missing_skills)
            .cloned()
            .collect();
        assert_eq!(union.len(), result.description_skill_count);
        assert!(result.matched_skills.is_disjoint(&result.missing_skills));
        assert_eq!(result.matched_skills.len(), 1);
        assert!(result.missing_skills.contains("sql"));
        assert!(result.missing_skills.contains("aws"));
        assert_eq!(result.candidate_skill_count, 2);
    }

    #[test]
    fn test_description_without_skills_scores_zero_with_no_missing() {
        let s = screener(&["python"]);
        let result = s.calculate_match("Python expert", "We value kindness above all");
        assert_eq!(result.skill_match_score, 0.0);
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.description_skill_count, 0);
        assert_eq!(result.candidate_skill_count, 1);
    }

    #[test]
    fn test_empty_candidate_scores_exactly_zero() {
        let s = default_screener();
        let result = s.calculate_match("", "Python developer with SQL and AWS");
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.similarity_score, 0.0);
        assert_eq!(result.skill_match_score, 0.0);
        assert_eq!(result.recommendation, Recommendation::NotRecommended);
        assert_eq!(result.similarity_status, SimilarityStatus::Degraded);
        assert_eq!(result.candidate_skill_count, 0);
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let s = default_screener();
        let cases = [
            ("", ""),
            ("python", "python"),
            ("Python SQL AWS Docker Kubernetes", "Python"),
            ("unrelated prose about gardening", "Python developer"),
        ];
        for (candidate, description) in cases {
            let r = s.calculate_match(candidate, description);
            for score in [r.overall_score, r.similarity_score, r.skill_match_score] {
                assert!((0.0..=100.0).contains(&score), "{score} out of bounds");
            }
        }
    }

    #[test]
    fn test_identical_texts_hit_the_top_tier() {
        let s = default_screener();
        let text = "Senior Python developer, SQL, AWS, Docker";
        let result = s.calculate_match(text, text);
        assert!((result.similarity_score - 100.0).abs() < 1e-9);
        assert_eq!(result.skill_match_score, 100.0);
        assert!((result.overall_score - 100.0).abs() < 1e-9);
        assert_eq!(result.recommendation, Recommendation::HighlyRecommended);
    }

    #[test]
    fn test_recommendation_thresholds_are_closed_below() {
        assert_eq!(
            Recommendation::from_score(70.0),
            Recommendation::HighlyRecommended
        );
        assert_eq!(Recommendation::from_score(69.999), Recommendation::Recommended);
        assert_eq!(Recommendation::from_score(55.0), Recommendation::Recommended);
        assert_eq!(Recommendation::from_score(54.999), Recommendation::Maybe);
        assert_eq!(Recommendation::from_score(35.0), Recommendation::Maybe);
        assert_eq!(
            Recommendation::from_score(34.999),
            Recommendation::NotRecommended
        );
        assert_eq!(Recommendation::from_score(0.0), Recommendation::NotRecommended);
    }

    #[test]
    fn test_overall_is_even_split_of_components() {
        let s = screener(&["python", "sql", "aws"]);
        let r = s.calculate_match("Python, SQL", "Python, SQL, AWS");
        let expected = 0.5 * r.similarity_score + 0.5 * r.skill_match_score;
        assert!((r.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_custom_weights_shift_the_composite() {
        let skills_only = Screener::with_config(
            SkillVocabulary::from_terms("test", ["python", "sql"]),
            StopWords::load(None).unwrap(),
            LemmaDictionary::load(None).unwrap(),
            ScoringWeights {
                similarity: 0.0,
                skills: 1.0,
            },
            DEFAULT_MAX_FEATURES,
        )
        .unwrap();
        let r = skills_only.calculate_match("Python only here", "Python and SQL");
        assert!((r.overall_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_sorts_descending_by_overall_score() {
        let s = default_screener();
        let description = "Python developer with SQL, AWS and Docker experience";
        let candidates = vec![
            ("weak".to_string(), "Retail management background".to_string()),
            (
                "strong".to_string(),
                "Python developer, SQL, AWS, Docker experience".to_string(),
            ),
            ("partial".to_string(), "Python and SQL scripting".to_string()),
        ];
        let ranked = s.rank(&candidates, description);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["strong", "partial", "weak"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].result.overall_score >= pair[1].result.overall_score);
        }
    }

    #[test]
    fn test_ranking_preserves_input_order_on_ties() {
        let s = default_screener();
        // Identical texts tie exactly; the stable sort must keep input order.
        let candidates = vec![
            ("first".to_string(), "Python and SQL".to_string()),
            ("second".to_string(), "Python and SQL".to_string()),
            ("third".to_string(), "Python and SQL".to_string()),
        ];
        let ranked = s.rank(&candidates, "Python developer wanted");
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_empty_batch_ranks_to_empty() {
        let s = default_screener();
        assert!(s.rank(&[], "Python developer").is_empty());
    }

    #[test]
    fn test_partial_skill_coverage_report() {
        let s = default_screener();
        let result = s.calculate_match("Python, SQL", "Python, SQL, AWS");
        // Candidate covers two of the three required skills.
        assert!((result.skill_match_score - 66.666).abs() < 0.01);
        assert_eq!(result.matched_skills.len(), 2);
        assert_eq!(
            result.missing_skills.iter().collect::<Vec<_>>(),
            ["aws"]
        );
        // Composite sits between the two components.
        assert!(result.overall_score <= result.skill_match_score.max(result.similarity_score));
        assert!(result.overall_score >= result.skill_match_score.min(result.similarity_score));
    }

    #[test]
    fn test_recommendation_labels() {
        assert_eq!(
            Recommendation::HighlyRecommended.label(),
            "Highly Recommended - Strong match"
        );
        assert_eq!(
            Recommendation::NotRecommended.label(),
            "Not Recommended - Weak match"
        );
    }
}
