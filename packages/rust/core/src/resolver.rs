//! The search orchestrator.
//!
//! Per request: index lookup on every target field → merge → if empty and
//! crawling is allowed, discover a candidate URL, crawl it, re-index the
//! extracted record, and synthesize the response. Callers always receive a
//! well-formed [`SearchResult`] (possibly empty) — only precondition
//! violations and total index unavailability surface as errors.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{info, instrument, warn};

use cnsearch_crawler::{
    Crawler, LogSideEffect, MetaNameInvader, NormalizeTransformer, TitleInvader,
};
use cnsearch_discovery::{DiscoveryOptions, discover};
use cnsearch_index::IndexStore;
use cnsearch_shared::{
    AppConfig, CnSearchError, Fuzziness, Item, MatchMap, Result, SearchResult, TargetField,
};

use crate::merge::merge_matches;

/// Domains that host profiles *about* companies but are never company sites
/// themselves. Filtered out of discovery results.
static EXCLUDE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"https://www\.linkedin\.com/.+",
        r"https://vk\.com/.+",
        r"https://www\.facebook\.com/.+",
        r"https://twitter\.com/.+",
        r"https://www\.instagram\.com/.+",
        r"https://www\.youtube\.com/.+",
        r"https://www\.pinterest\.com/.+",
        r"https://www\.tumblr\.com/.+",
        r"https://www\.wikipedia\.org/.+",
        r"https://www\.yelp\.com/.+",
        r"https://www\.glassdoor\.com/.+",
        r"https://www\.ok\.ru/.+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("exclude pattern"))
    .collect()
});

/// How many URLs the fallback path requests from web discovery.
const DISCOVERY_URL_COUNT: usize = 1;

/// Orchestrates the resolution pipeline. Built once at startup, shared
/// read-only across request tasks.
pub struct Resolver {
    store: IndexStore,
    index_name: String,
    crawler: Crawler,
    discovery: DiscoveryOptions,
}

impl Resolver {
    /// Build the resolver and its crawl pipeline from config.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = IndexStore::new(
            &config.index.url,
            Duration::from_secs(config.index.timeout_secs),
        )?;

        let mut crawler = Crawler::new(Duration::from_secs(config.crawl.timeout_secs))?;
        crawler
            .add_invader(TitleInvader)
            .add_invader(MetaNameInvader)
            .add_transformer(NormalizeTransformer)
            .add_side_effect(LogSideEffect);

        Ok(Self {
            store,
            index_name: config.index.name.clone(),
            crawler,
            discovery: DiscoveryOptions::from(&config.discovery),
        })
    }

    /// Resolve a free-text company name to ranked candidates.
    ///
    /// With `allow_crawl`, an empty index lookup falls back to web
    /// discovery + crawling; discovery and crawl failures degrade to an
    /// empty result rather than erroring.
    #[instrument(skip(self), fields(query = %company_name))]
    pub async fn resolve(&self, company_name: &str, allow_crawl: bool) -> Result<SearchResult> {
        let merged = self.index_lookup(company_name).await?;

        if !merged.is_empty() || !allow_crawl {
            info!(matches = merged.len(), allow_crawl, "resolved from index");
            return Ok(SearchResult {
                query_string: company_name.to_string(),
                matches: merged,
            });
        }

        info!("no index matches, falling back to web discovery");

        let urls = match discover(
            &self.discovery,
            company_name,
            DISCOVERY_URL_COUNT,
            &EXCLUDE_PATTERNS,
        )
        .await
        {
            Ok(urls) => urls,
            Err(e) => {
                warn!(error = %e, "discovery failed, degrading to empty result");
                return Ok(SearchResult::empty(company_name));
            }
        };

        let mut items: Vec<Item> = Vec::new();

        for url in urls {
            let mut crawled = match self.crawler.crawl(std::slice::from_ref(&url)).await {
                Ok(crawled) => crawled,
                Err(e) => {
                    warn!(%url, error = %e, "crawl failed, skipping url");
                    continue;
                }
            };

            let Some(mut item) = crawled.remove(&url) else {
                continue;
            };

            // The pipeline cannot know the raw query; fill it here before
            // the item is persisted or returned.
            item.query_string = company_name.to_string();

            if let Err(e) = self.store.insert(&self.index_name, &item, false).await {
                warn!(%url, error = %e, "failed to re-index crawled item");
            }

            items.push(item);
        }

        info!(crawled = items.len(), "resolved via crawl fallback");
        Ok(SearchResult::from_items(company_name, items))
    }

    /// Search every target field concurrently and merge in the fixed field
    /// order. A failed field is treated as empty; only when every field
    /// fails does the lookup error out.
    async fn index_lookup(&self, query: &str) -> Result<MatchMap> {
        let [f0, f1, f2, f3] = TargetField::ALL;
        let results = tokio::join!(
            self.store.search(&self.index_name, f0, query, Fuzziness::One),
            self.store.search(&self.index_name, f1, query, Fuzziness::One),
            self.store.search(&self.index_name, f2, query, Fuzziness::One),
            self.store.search(&self.index_name, f3, query, Fuzziness::One),
        );

        let mut maps = Vec::with_capacity(4);
        let mut last_error = None;

        let field_results = [results.0, results.1, results.2, results.3];
        for (field, result) in TargetField::ALL.into_iter().zip(field_results) {
            match result {
                Ok(map) => maps.push(map),
                Err(e) => {
                    warn!(%field, error = %e, "field lookup failed, treating as empty");
                    last_error = Some(e);
                }
            }
        }

        if maps.is_empty() {
            let detail = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no fields queried".into());
            return Err(CnSearchError::StoreUnavailable(format!(
                "all field lookups failed: {detail}"
            )));
        }

        Ok(merge_matches(maps))
    }

    /// Append a record to the index (caller-facing insert path).
    pub async fn insert(&self, item: &Item) -> Result<()> {
        self.store.insert(&self.index_name, item, false).await
    }

    /// Provision the index if it does not exist yet.
    pub async fn ensure_index(&self) -> Result<()> {
        self.store.ensure_index(&self.index_name).await
    }

    /// Liveness of the backing index store.
    pub async fn is_ready(&self) -> bool {
        self.store.ping().await
    }
}
