//! Web discovery: find candidate company URLs via a public search engine.
//!
//! When the index has no confident match for a query, the orchestrator asks
//! this crate for the top web result(s). Discovery scrapes the engine's HTML
//! results pages directly, paginating until enough usable URLs are gathered.
//!
//! Exclude patterns are applied here, before a URL counts toward the
//! requested total, so every returned URL is usable by the caller.

mod parser;

use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use cnsearch_shared::{CnSearchError, DiscoveryConfig, Result};

/// Browser-like User-Agent; search engines serve a different (unparseable)
/// markup to obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36";

/// Extra results requested per page over what is still needed, to absorb
/// blocks lost to filtering.
const OVERFETCH: usize = 2;

/// Pagination stops after this many pages even if the target is not met.
const MAX_PAGES: usize = 10;

/// Configuration for the discovery process.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Search endpoint issuing HTML result pages.
    pub endpoint: String,
    /// Result language hint.
    pub lang: String,
    /// Timeout for each search request in seconds.
    pub timeout_secs: u64,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::from(&DiscoveryConfig::default())
    }
}

impl From<&DiscoveryConfig> for DiscoveryOptions {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            lang: config.lang.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Discover up to `desired_count` candidate URLs for `term`, in encounter
/// order.
///
/// Each round requests `remaining + 2` results and advances the result
/// offset past every parsed block, so excluded results are not re-fetched.
/// Returns fewer than `desired_count` URLs only when the engine runs dry.
///
/// # Errors
///
/// A non-success response from the engine fails the whole call with
/// [`CnSearchError::DiscoveryUnavailable`]; no partial results are returned.
#[instrument(skip(opts, exclude), fields(term = %term))]
pub async fn discover(
    opts: &DiscoveryOptions,
    term: &str,
    desired_count: usize,
    exclude: &[Regex],
) -> Result<Vec<Url>> {
    let client = build_client(opts)?;

    let mut urls: Vec<Url> = Vec::new();
    let mut offset = 0usize;

    for page in 0..MAX_PAGES {
        if urls.len() >= desired_count {
            break;
        }

        let remaining = desired_count - urls.len();
        let body = fetch_results_page(&client, opts, term, remaining + OVERFETCH, offset).await?;

        let candidates = parser::parse_result_page(&body);
        if candidates.is_empty() {
            debug!(page, offset, "engine returned no usable blocks, stopping");
            break;
        }

        for href in candidates {
            offset += 1;

            let url = match Url::parse(&href) {
                Ok(url) => url,
                Err(e) => {
                    debug!(%href, error = %e, "skipping unparseable result link");
                    continue;
                }
            };

            if exclude.iter().any(|re| re.is_match(url.as_str())) {
                debug!(%url, "excluded by deny pattern");
                continue;
            }

            urls.push(url);
            if urls.len() >= desired_count {
                break;
            }
        }
    }

    if urls.len() < desired_count {
        warn!(
            collected = urls.len(),
            desired_count, "discovery ran dry before reaching target"
        );
    }

    info!(collected = urls.len(), "discovery finished");
    Ok(urls)
}

/// Build a reqwest client with browser-like settings.
fn build_client(opts: &DiscoveryOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| {
            CnSearchError::DiscoveryUnavailable(format!("failed to build HTTP client: {e}"))
        })
}

/// Issue one search request and return the raw HTML results page.
async fn fetch_results_page(
    client: &Client,
    opts: &DiscoveryOptions,
    term: &str,
    num: usize,
    start: usize,
) -> Result<String> {
    let response = client
        .get(&opts.endpoint)
        .query(&[
            ("q", term),
            ("num", &num.to_string()),
            ("hl", &opts.lang),
            ("start", &start.to_string()),
        ])
        .send()
        .await
        .map_err(|e| CnSearchError::DiscoveryUnavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CnSearchError::DiscoveryUnavailable(format!(
            "search engine returned HTTP {status}"
        )));
    }

    response
        .text()
        .await
        .map_err(|e| CnSearchError::DiscoveryUnavailable(format!("failed to read body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn opts_for(server: &MockServer) -> DiscoveryOptions {
        DiscoveryOptions {
            endpoint: server.uri(),
            lang: "en".into(),
            timeout_secs: 2,
        }
    }

    fn result_block(href: &str, title: &str) -> String {
        format!(
            r#"<div class="g">
                <a href="{href}"><br></a>
                <h3>{title}</h3>
                <div style="-webkit-line-clamp:2"><span>Two lines of description.</span></div>
            </div>"#
        )
    }

    fn page(blocks: &[String]) -> String {
        format!("<html><body>{}</body></html>", blocks.join("\n"))
    }

    #[tokio::test]
    async fn collects_desired_count_in_order() {
        let server = MockServer::start().await;

        let body = page(&[
            result_block("https://acme.example/", "Acme"),
            result_block("https://other.example/", "Other"),
            result_block("https://third.example/", "Third"),
        ]);

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let urls = discover(&opts_for(&server), "acme", 2, &[]).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].as_str(), "https://acme.example/");
        assert_eq!(urls[1].as_str(), "https://other.example/");
    }

    #[tokio::test]
    async fn excluded_urls_do_not_count_toward_target() {
        let server = MockServer::start().await;

        let body = page(&[
            result_block("https://www.linkedin.com/company/acme", "Acme | LinkedIn"),
            result_block("https://acme.example/", "Acme"),
        ]);

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let exclude = vec![Regex::new(r"https://www\.linkedin\.com/.+").unwrap()];
        let urls = discover(&opts_for(&server), "acme", 1, &exclude)
            .await
            .unwrap();

        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].as_str(), "https://acme.example/");
    }

    #[tokio::test]
    async fn paginates_until_target_met() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("start", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(page(&[result_block("https://first.example/", "First")])),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("start", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(page(&[result_block("https://second.example/", "Second")])),
            )
            .mount(&server)
            .await;

        let urls = discover(&opts_for(&server), "acme", 2, &[]).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[1].as_str(), "https://second.example/");
    }

    #[tokio::test]
    async fn dry_engine_returns_partial_without_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(page(&[])),
            )
            .mount(&server)
            .await;

        let urls = discover(&opts_for(&server), "acme", 3, &[]).await.unwrap();
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn non_success_fails_whole_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = discover(&opts_for(&server), "acme", 1, &[]).await.unwrap_err();
        assert!(matches!(err, CnSearchError::DiscoveryUnavailable(_)));
    }
}
