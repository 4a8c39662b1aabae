//! Composable crawl pipeline: fetch a URL, run pluggable extraction stages,
//! and produce a canonical [`Item`].
//!
//! A [`Crawler`] holds three ordered stage lists, registered once at startup
//! and read-only thereafter:
//! - [`Invader`]s: page body → candidate string (each seeds one candidate)
//! - [`Transformer`]s: applied in order to every invader's output
//! - [`SideEffect`]s: awaited once per distinct non-empty candidate
//!
//! Failure model over a multi-URL batch is fail-fast: a fetch timeout or any
//! unexpected fault aborts the whole call, discarding earlier results. A
//! plain non-success status only skips that URL.

pub mod stages;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use cnsearch_shared::{CnSearchError, Item, Result};

pub use stages::{
    Invader, LogSideEffect, MetaNameInvader, NormalizeTransformer, SideEffect, TitleInvader,
    Transformer,
};

/// Browser-like User-Agent; many company sites refuse obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36";

/// Registry of pipeline stages plus the HTTP client, reused across crawls.
pub struct Crawler {
    client: Client,
    invaders: Vec<Box<dyn Invader>>,
    transformers: Vec<Box<dyn Transformer>>,
    side_effects: Vec<Box<dyn SideEffect>>,
}

impl Crawler {
    /// Create an empty crawler with the given per-fetch timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| CnSearchError::CrawlFailure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            invaders: Vec::new(),
            transformers: Vec::new(),
            side_effects: Vec::new(),
        })
    }

    /// Register an extraction stage. Order of registration is run order.
    pub fn add_invader(&mut self, invader: impl Invader + 'static) -> &mut Self {
        self.invaders.push(Box::new(invader));
        self
    }

    /// Register a transformation stage, composed after earlier ones.
    pub fn add_transformer(&mut self, transformer: impl Transformer + 'static) -> &mut Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Register an observational side effect.
    pub fn add_side_effect(&mut self, side_effect: impl SideEffect + 'static) -> &mut Self {
        self.side_effects.push(Box::new(side_effect));
        self
    }

    /// Crawl the given URLs in order, producing one [`Item`] per URL that
    /// yielded at least one candidate.
    ///
    /// # Errors
    ///
    /// [`CnSearchError::CrawlTimeout`] if any single fetch times out,
    /// [`CnSearchError::CrawlFailure`] on any other fault; both abort the
    /// remaining batch.
    #[instrument(skip_all, fields(urls = urls.len()))]
    pub async fn crawl(&self, urls: &[Url]) -> Result<HashMap<Url, Item>> {
        let mut results = HashMap::new();

        for url in urls {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| classify_fetch_error(url, e))?;

            let status = response.status();
            if !status.is_success() {
                debug!(%url, %status, "non-success response, skipping url");
                continue;
            }

            let html = response
                .text()
                .await
                .map_err(|e| classify_fetch_error(url, e))?;

            let candidates = self.run_stages(&html).await;
            if candidates.is_empty() {
                debug!(%url, "no candidates extracted, skipping url");
                continue;
            }

            // Shortest candidate wins; min_by_key keeps the first on ties.
            let shortest = candidates
                .iter()
                .min_by_key(|c| c.len())
                .cloned()
                .unwrap_or_default();

            let company_name = capitalize(&shortest);
            let normalized_name = company_name.to_lowercase();

            results.insert(
                url.clone(),
                Item {
                    company_name,
                    company_url: url.to_string(),
                    query_string: String::new(),
                    normalized_name,
                },
            );
        }

        Ok(results)
    }

    /// Run all invaders over the page body, compose the transformer chain
    /// over each output, and collect distinct non-empty candidates in
    /// encounter order, firing side effects as they are accepted.
    async fn run_stages(&self, html: &str) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for invader in &self.invaders {
            let mut candidate = invader.extract(html);
            for transformer in &self.transformers {
                candidate = transformer.transform(candidate);
            }

            if candidate.is_empty() || !seen.insert(candidate.clone()) {
                continue;
            }

            for side_effect in &self.side_effects {
                side_effect.observe(&candidate).await;
            }

            candidates.push(candidate);
        }

        candidates
    }
}

/// Map a reqwest error to the crawl error taxonomy.
fn classify_fetch_error(url: &Url, e: reqwest::Error) -> CnSearchError {
    if e.is_timeout() {
        CnSearchError::CrawlTimeout(format!("{url}: {e}"))
    } else {
        CnSearchError::CrawlFailure(format!("{url}: {e}"))
    }
}

/// Python-style capitalization: first character uppercased, the rest
/// lowercased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Suffix(&'static str);

    impl Transformer for Suffix {
        fn transform(&self, input: String) -> String {
            if input.is_empty() {
                input
            } else {
                format!("{input}{}", self.0)
            }
        }
    }

    struct CountingEffect(Arc<AtomicUsize>);

    #[async_trait]
    impl SideEffect for CountingEffect {
        async fn observe(&self, _candidate: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn crawler() -> Crawler {
        Crawler::new(Duration::from_secs(2)).unwrap()
    }

    async fn mount_page(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn capitalize_is_python_style() {
        assert_eq!(capitalize("acme"), "Acme");
        assert_eq!(capitalize("ACME GLOBAL"), "Acme global");
        assert_eq!(capitalize(""), "");
    }

    #[tokio::test]
    async fn shortest_candidate_becomes_item_name() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/",
            r#"<html><head>
                <title>Acme Corp</title>
                <meta property="og:site_name" content="Acme">
            </head><body></body></html>"#,
        )
        .await;

        let mut crawler = crawler();
        crawler.add_invader(TitleInvader).add_invader(MetaNameInvader);

        let url = Url::parse(&server.uri()).unwrap();
        let results = crawler.crawl(&[url.clone()]).await.unwrap();

        let item = &results[&url];
        assert_eq!(item.company_name, "Acme");
        assert_eq!(item.normalized_name, "acme");
        assert_eq!(item.company_url, url.to_string());
        assert!(item.query_string.is_empty());
    }

    #[tokio::test]
    async fn transformers_compose_in_registration_order() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/",
            "<html><head><title>acme</title></head><body></body></html>",
        )
        .await;

        let mut crawler = crawler();
        crawler
            .add_invader(TitleInvader)
            .add_transformer(Suffix("-a"))
            .add_transformer(Suffix("-b"));

        let url = Url::parse(&server.uri()).unwrap();
        let results = crawler.crawl(&[url.clone()]).await.unwrap();

        assert_eq!(results[&url].company_name, "Acme-a-b");
    }

    #[tokio::test]
    async fn side_effects_fire_once_per_distinct_candidate() {
        let server = MockServer::start().await;
        // Both invaders yield the same string; the duplicate is dropped.
        mount_page(
            &server,
            "/",
            r#"<html><head>
                <title>Acme</title>
                <meta property="og:site_name" content="Acme">
            </head><body></body></html>"#,
        )
        .await;

        let count = Arc::new(AtomicUsize::new(0));
        let mut crawler = crawler();
        crawler
            .add_invader(TitleInvader)
            .add_invader(MetaNameInvader)
            .add_side_effect(CountingEffect(count.clone()));

        let url = Url::parse(&server.uri()).unwrap();
        crawler.crawl(&[url]).await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_success_status_skips_url_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_page(
            &server,
            "/present",
            "<html><head><title>Acme</title></head><body></body></html>",
        )
        .await;

        let mut crawler = crawler();
        crawler.add_invader(TitleInvader);

        let missing = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let present = Url::parse(&format!("{}/present", server.uri())).unwrap();
        let results = crawler.crawl(&[missing.clone(), present.clone()]).await.unwrap();

        assert_eq!(results.len(), 1);
        assert!(results.contains_key(&present));
    }

    #[tokio::test]
    async fn page_without_candidates_produces_no_item() {
        let server = MockServer::start().await;
        mount_page(&server, "/", "<html><head></head><body></body></html>").await;

        let mut crawler = crawler();
        crawler.add_invader(TitleInvader);

        let url = Url::parse(&server.uri()).unwrap();
        let results = crawler.crawl(&[url]).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn fetch_timeout_aborts_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html></html>")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut crawler = Crawler::new(Duration::from_millis(200)).unwrap();
        crawler.add_invader(TitleInvader);

        let url = Url::parse(&server.uri()).unwrap();
        let err = crawler.crawl(&[url]).await.unwrap_err();
        assert!(matches!(err, CnSearchError::CrawlTimeout(_)));
    }

    #[tokio::test]
    async fn connection_failure_is_generic_crawl_error() {
        let mut crawler = Crawler::new(Duration::from_millis(500)).unwrap();
        crawler.add_invader(TitleInvader);

        // Port 1 is never listening.
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let err = crawler.crawl(&[url]).await.unwrap_err();
        assert!(matches!(err, CnSearchError::CrawlFailure(_)));
    }
}
