//! Lexicon resources — the engine's read-only lookup data.
//!
//! Three resources are loaded exactly once at startup and never mutated:
//! the skill vocabulary, the stop-word set, and the lemma dictionary.
//! Each carries a version string so a score can always be traced back to
//! the lexicon revision that produced it. Defaults are embedded in the
//! binary; operators can substitute files via config, and tests build
//! small lexicons directly with the `from_*` constructors.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

use thiserror::Error;

const EMBEDDED_SKILLS: &str = include_str!("../../assets/skills.txt");
const EMBEDDED_STOPWORDS: &str = include_str!("../../assets/stopwords.txt");
const EMBEDDED_LEMMAS: &str = include_str!("../../assets/lemmas.tsv");

/// Version reported when a lexicon file carries no `version:` line.
const UNVERSIONED: &str = "unversioned";

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} lexicon: malformed entry on line {line}: {detail}")]
    Malformed {
        name: &'static str,
        line: usize,
        detail: String,
    },

    #[error("{name} lexicon is empty")]
    Empty { name: &'static str },
}

fn read_lexicon_file(path: &Path) -> Result<String, LexiconError> {
    fs::read_to_string(path).map_err(|source| LexiconError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Iterates data lines of a lexicon file: skips blanks and `#` comments,
/// and pulls the first `version:` line out as the resource version.
fn data_lines(content: &str) -> (String, Vec<(usize, &str)>) {
    let mut version = None;
    let mut lines = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(v) = line.strip_prefix("version:") {
            version.get_or_insert_with(|| v.trim().to_string());
            continue;
        }
        lines.push((idx + 1, line));
    }
    (version.unwrap_or_else(|| UNVERSIONED.to_string()), lines)
}

// ────────────────────────────────────────────────────────────────────────────
// Skill vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of known skill terms and phrases.
///
/// Terms are stored lowercase; matching against documents is the skill
/// extractor's job. Immutable after load — safe to share across requests
/// without locking.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    version: String,
    terms: BTreeSet<String>,
}

impl SkillVocabulary {
    /// Loads the vocabulary from `path`, or the embedded default when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, LexiconError> {
        let content = match path {
            Some(p) => read_lexicon_file(p)?,
            None => EMBEDDED_SKILLS.to_string(),
        };
        Self::parse(&content)
    }

    /// Builds a vocabulary from terms directly. Intended for tests and
    /// embedders that manage their own skill lists.
    pub fn from_terms<I, S>(version: &str, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            version: version.to_string(),
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    fn parse(content: &str) -> Result<Self, LexiconError> {
        let (version, lines) = data_lines(content);
        let terms: BTreeSet<String> = lines
            .iter()
            .map(|(_, line)| line.to_lowercase())
            .collect();
        if terms.is_empty() {
            return Err(LexiconError::Empty { name: "skill" });
        }
        Ok(Self { version, terms })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stop words
// ────────────────────────────────────────────────────────────────────────────

/// Fixed English stop-word set consulted during normalization.
#[derive(Debug, Clone)]
pub struct StopWords {
    version: String,
    words: HashSet<String>,
}

impl StopWords {
    pub fn load(path: Option<&Path>) -> Result<Self, LexiconError> {
        let content = match path {
            Some(p) => read_lexicon_file(p)?,
            None => EMBEDDED_STOPWORDS.to_string(),
        };
        Self::parse(&content)
    }

    pub fn from_words<I, S>(version: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            version: version.to_string(),
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    fn parse(content: &str) -> Result<Self, LexiconError> {
        let (version, lines) = data_lines(content);
        let words: HashSet<String> = lines
            .iter()
            .map(|(_, line)| line.to_lowercase())
            .collect();
        if words.is_empty() {
            return Err(LexiconError::Empty { name: "stop-word" });
        }
        Ok(Self { version, words })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lemma dictionary
// ────────────────────────────────────────────────────────────────────────────

/// Inflected-form → base-form lookup table.
///
/// Pure lexical lookup, no suffix rules: a token either has an entry or
/// passes through unchanged. Entries keep normalization idempotent: every
/// base form is longer than two characters, is not itself mapped further,
/// and is not a stop word in the shipped stop-word set.
#[derive(Debug, Clone)]
pub struct LemmaDictionary {
    version: String,
    entries: HashMap<String, String>,
}

impl LemmaDictionary {
    pub fn load(path: Option<&Path>) -> Result<Self, LexiconError> {
        let content = match path {
            Some(p) => read_lexicon_file(p)?,
            None => EMBEDDED_LEMMAS.to_string(),
        };
        Self::parse(&content)
    }

    pub fn from_pairs<I, S>(version: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        Self {
            version: version.to_string(),
            entries: pairs
                .into_iter()
                .map(|(k, v)| {
                    (
                        k.as_ref().trim().to_lowercase(),
                        v.as_ref().trim().to_lowercase(),
                    )
                })
                .collect(),
        }
    }

    fn parse(content: &str) -> Result<Self, LexiconError> {
        let (version, lines) = data_lines(content);
        let mut entries = HashMap::with_capacity(lines.len());
        for (line_no, line) in lines {
            let (inflected, base) =
                line.split_once('\t')
                    .ok_or_else(|| LexiconError::Malformed {
                        name: "lemma",
                        line: line_no,
                        detail: "expected '<inflected>\\t<base>'".to_string(),
                    })?;
            let inflected = inflected.trim().to_lowercase();
            let base = base.trim().to_lowercase();
            if inflected.is_empty() || base.is_empty() {
                return Err(LexiconError::Malformed {
                    name: "lemma",
                    line: line_no,
                    detail: "empty inflected or base form".to_string(),
                });
            }
            entries.insert(inflected, base);
        }
        if entries.is_empty() {
            return Err(LexiconError::Empty { name: "lemma" });
        }
        Ok(Self { version, entries })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resolves a token to its base form; unknown tokens pass through.
    pub fn lemma<'a>(&'a self, token: &'a str) -> &'a str {
        self.entries.get(token).map(String::as_str).unwrap_or(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
