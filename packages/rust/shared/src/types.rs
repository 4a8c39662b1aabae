//! Core domain types for company-name resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CnSearchError;

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A resolved company record — the document shape stored in the index.
///
/// Constructed by the crawl pipeline from a single crawled page and immutable
/// afterwards, except `query_string`: the pipeline cannot know the raw query
/// that triggered the crawl, so the orchestrator fills it in before indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Display form of the company name.
    pub company_name: String,
    /// Source URL the record was extracted from, or empty.
    pub company_url: String,
    /// Raw query that produced this record; empty until filled by the caller.
    pub query_string: String,
    /// Canonicalized (lowercase) form of the name.
    pub normalized_name: String,
}

// ---------------------------------------------------------------------------
// Match / MatchMap / SearchResult
// ---------------------------------------------------------------------------

/// A scored candidate returned from the index or synthesized from a crawl.
///
/// Index-originated matches carry the relevance score reported by the store;
/// freshly crawled matches always carry `score = 1.0` (discovered but
/// unverified confidence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Non-negative relevance score.
    pub score: f64,
    /// Display form of the company name.
    pub company_name: String,
    /// Source URL, or empty.
    pub company_url: String,
    /// Canonicalized form of the name.
    #[serde(default)]
    pub normalized_name: String,
    /// Raw query that produced the record, if known.
    #[serde(default)]
    pub query_string: String,
}

/// Mapping from match key to [`Match`]. Keys are unique within one map;
/// iteration order is irrelevant.
pub type MatchMap = HashMap<String, Match>;

/// The unit returned to callers of the resolution pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The raw query the caller supplied.
    pub query_string: String,
    /// Ranked candidates, keyed per map convention (see crate docs).
    pub matches: MatchMap,
}

impl SearchResult {
    /// An empty result for the given query.
    pub fn empty(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
            matches: MatchMap::new(),
        }
    }

    /// Synthesize a result from freshly crawled items.
    ///
    /// Each item becomes a match keyed by its `normalized_name` with the
    /// conventional `score = 1.0` for crawler-originated candidates.
    pub fn from_items(query_string: impl Into<String>, items: Vec<Item>) -> Self {
        let matches = items
            .into_iter()
            .map(|item| {
                (
                    item.normalized_name.clone(),
                    Match {
                        score: 1.0,
                        company_name: item.company_name,
                        company_url: item.company_url,
                        normalized_name: item.normalized_name,
                        query_string: item.query_string,
                    },
                )
            })
            .collect();

        Self {
            query_string: query_string.into(),
            matches,
        }
    }
}

// ---------------------------------------------------------------------------
// TargetField
// ---------------------------------------------------------------------------

/// The fixed set of indexed fields a search may target.
///
/// `ALL` lists the fields in the order the orchestrator queries and merges
/// them; the order is part of the merge tie-break contract and must not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetField {
    /// Display company name.
    CompanyName,
    /// Canonicalized name.
    NormalizedName,
    /// Raw query strings of past lookups.
    QueryString,
    /// Source URL.
    CompanyUrl,
}

impl TargetField {
    /// All target fields, in the fixed lookup/merge order.
    pub const ALL: [Self; 4] = [
        Self::CompanyName,
        Self::NormalizedName,
        Self::QueryString,
        Self::CompanyUrl,
    ];

    /// The field name as stored in the index mapping.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::NormalizedName => "normalized_name",
            Self::QueryString => "query_string",
            Self::CompanyUrl => "company_url",
        }
    }
}

impl std::fmt::Display for TargetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TargetField {
    type Err = CnSearchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "company_name" => Ok(Self::CompanyName),
            "normalized_name" => Ok(Self::NormalizedName),
            "query_string" => Ok(Self::QueryString),
            "company_url" => Ok(Self::CompanyUrl),
            other => Err(CnSearchError::InvalidField(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Fuzziness
// ---------------------------------------------------------------------------

/// Maximum edit distance tolerated when matching a query term against an
/// indexed field. Only levels 0–2 are supported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fuzziness {
    /// Exact match.
    Zero,
    /// One edit. The orchestrator's default.
    #[default]
    One,
    /// Two edits.
    Two,
}

impl Fuzziness {
    /// Wire representation expected by the index store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Two => "2",
        }
    }
}

impl std::fmt::Display for Fuzziness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Fuzziness {
    type Err = CnSearchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::Zero),
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            other => Err(CnSearchError::InvalidFuzziness(other.to_string())),
        }
    }
}
