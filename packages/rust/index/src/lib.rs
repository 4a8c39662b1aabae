//! Client for the external full-text index store.
//!
//! The store is a remote service speaking an Elasticsearch-compatible JSON
//! API; this crate owns request construction ([`query`]), relevance
//! filtering, and the transport. Ranking internals belong to the store.
//!
//! No retry policy lives here: a transport failure surfaces as
//! [`CnSearchError::StoreUnavailable`] and the caller decides.

pub mod query;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};

use cnsearch_shared::{CnSearchError, Fuzziness, Item, MatchMap, Result, TargetField};

use crate::query::SearchResponse;

/// Handle to the remote index store, cheap to share across tasks.
#[derive(Debug, Clone)]
pub struct IndexStore {
    client: Client,
    base: String,
}

impl IndexStore {
    /// Create a store client for the given base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CnSearchError::StoreUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search one indexed field with the given fuzziness level.
    ///
    /// Returns the filtered [`MatchMap`]; hits at or below the relevance
    /// threshold are discarded.
    #[instrument(skip(self), fields(field = %field))]
    pub async fn search(
        &self,
        index: &str,
        field: TargetField,
        query_string: &str,
        fuzziness: Fuzziness,
    ) -> Result<MatchMap> {
        let body = query::match_fuzzy(field, query_string, fuzziness);
        debug!(request = %body, "issuing fuzzy search");

        let response = self
            .client
            .post(format!("{}/{index}/_search", self.base))
            .json(&body)
            .send()
            .await
            .map_err(|e| CnSearchError::StoreUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CnSearchError::StoreUnavailable(format!(
                "search returned HTTP {status}"
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| CnSearchError::StoreUnavailable(format!("malformed response: {e}")))?;

        let matches = query::relevant_matches(parsed.hits.hits);
        info!(matches = matches.len(), "search filtered");

        Ok(matches)
    }

    /// Append a document to the index. The store enforces no uniqueness;
    /// with `check_exists` an exact lookup on `normalized_name` is made
    /// first and the insert is skipped on a hit.
    #[instrument(skip(self, item), fields(name = %item.normalized_name))]
    pub async fn insert(&self, index: &str, item: &Item, check_exists: bool) -> Result<()> {
        if check_exists {
            let existing = self
                .search(
                    index,
                    TargetField::NormalizedName,
                    &item.normalized_name,
                    Fuzziness::Zero,
                )
                .await?;

            if !existing.is_empty() {
                info!("document already indexed, skipping insert");
                return Ok(());
            }
        }

        let response = self
            .client
            .post(format!("{}/{index}/_doc", self.base))
            .json(item)
            .send()
            .await
            .map_err(|e| CnSearchError::StoreUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CnSearchError::StoreUnavailable(format!(
                "insert returned HTTP {status}"
            )));
        }

        info!("document indexed");
        Ok(())
    }

    /// Provision the index with the fixed four-field mapping if it does not
    /// already exist.
    #[instrument(skip(self))]
    pub async fn ensure_index(&self, index: &str) -> Result<()> {
        let response = self
            .client
            .head(format!("{}/{index}", self.base))
            .send()
            .await
            .map_err(|e| CnSearchError::StoreUnavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                debug!("index already exists");
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                info!("creating index");
                let response = self
                    .client
                    .put(format!("{}/{index}", self.base))
                    .json(&query::index_mapping())
                    .send()
                    .await
                    .map_err(|e| CnSearchError::StoreUnavailable(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(CnSearchError::StoreUnavailable(format!(
                        "index creation returned HTTP {status}"
                    )));
                }
                Ok(())
            }
            status => Err(CnSearchError::StoreUnavailable(format!(
                "index probe returned HTTP {status}"
            ))),
        }
    }

    /// Liveness probe against the store root.
    pub async fn ping(&self) -> bool {
        match self.client.get(&self.base).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
