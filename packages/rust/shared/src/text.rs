//! Company-name string normalization.
//!
//! The full cleaning model (legal-form stripping, entity extraction) is an
//! external concern; the pipeline consumes normalization as a pure function.

/// Normalize a free-text company name: trim, collapse internal whitespace,
/// and drop surrounding punctuation noise. Case is preserved — the crawl
/// pipeline handles casing when it builds an [`Item`](crate::Item).
pub fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '&'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
