// Matching engine: lexicon loading, text normalization, skill extraction,
// TF-IDF similarity and weighted aggregation, plus the HTTP handlers that
// expose it. Everything outside handlers.rs is pure and synchronous.

pub mod handlers;
pub mod lexicon;
pub mod matcher;
pub mod normalizer;
pub mod similarity;
pub mod skills;
