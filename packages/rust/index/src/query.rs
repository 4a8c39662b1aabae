//! Fuzzy query construction and hit shaping for the index store.
//!
//! The store speaks an Elasticsearch-compatible JSON API: a `match` clause
//! with a `fuzziness` level per request, hits carrying `_score` and a
//! `_source` document.

use serde::Deserialize;
use serde_json::{Value, json};

use cnsearch_shared::{Fuzziness, Item, Match, MatchMap, TargetField};

/// Hits scoring at or below this are discarded as irrelevant.
pub const RELEVANCE_THRESHOLD: f64 = 0.01;

/// Build a fuzzy `match` request body for a single field.
pub fn match_fuzzy(field: TargetField, query: &str, fuzziness: Fuzziness) -> Value {
    let mut clause = serde_json::Map::new();
    clause.insert(
        field.as_str().to_string(),
        json!({
            "query": query,
            "fuzziness": fuzziness.as_str(),
        }),
    );

    json!({ "query": { "match": clause } })
}

/// The fixed four-field schema provisioned for the company index.
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "company_name": { "type": "text" },
                "normalized_name": { "type": "text" },
                "query_string": { "type": "text" },
                "company_url": { "type": "keyword" },
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Top-level search response envelope.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Hit envelope.
    pub hits: HitsEnvelope,
}

/// The `hits` envelope wrapping the actual hit list.
#[derive(Debug, Deserialize)]
pub struct HitsEnvelope {
    /// Raw hits in store ranking order.
    pub hits: Vec<Hit>,
}

/// One raw hit from the store.
#[derive(Debug, Deserialize)]
pub struct Hit {
    /// Relevance score; the store reports `null` for unscored hits.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    /// The stored document.
    #[serde(rename = "_source")]
    pub source: Item,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Shape raw hits into a [`MatchMap`], dropping hits at or below the
/// relevance threshold.
pub fn relevant_matches(hits: Vec<Hit>) -> MatchMap {
    let mut matches = MatchMap::new();

    for hit in hits {
        let score = hit.score.unwrap_or(0.0);
        if score <= RELEVANCE_THRESHOLD {
            continue;
        }

        let key = match_key(&hit.source).to_string();
        let source = hit.source;
        matches.insert(
            key,
            Match {
                score,
                company_name: source.company_name,
                company_url: source.company_url,
                normalized_name: source.normalized_name,
                query_string: source.query_string,
            },
        );
    }

    matches
}

/// Derive the display key for a hit: the shorter of the name-bearing field
/// values. `min_by_key` keeps the first minimum, so ties go to
/// `company_name`.
fn match_key(item: &Item) -> &str {
    [item.company_name.as_str(), item.normalized_name.as_str()]
        .into_iter()
        .min_by_key(|v| v.len())
        .unwrap_or_default()
}
