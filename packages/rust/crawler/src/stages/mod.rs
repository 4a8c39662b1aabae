//! Pipeline stage traits and built-in stages.
//!
//! The crawl pipeline is stage-agnostic: it knows nothing about what an
//! invader or transformer does. New extraction strategies (microdata,
//! structured data) plug in without touching the pipeline itself.

mod meta;
mod title;

use async_trait::async_trait;
use tracing::info;

pub use meta::MetaNameInvader;
pub use title::TitleInvader;

// ---------------------------------------------------------------------------
// Stage traits
// ---------------------------------------------------------------------------

/// An extraction stage: raw page body → candidate string.
///
/// Each registered invader independently seeds one candidate per page; an
/// empty return means the invader found nothing.
pub trait Invader: Send + Sync {
    /// Extract a candidate string from the page body.
    fn extract(&self, html: &str) -> String;
}

/// A normalization stage applied to every invader's output, in registration
/// order.
pub trait Transformer: Send + Sync {
    /// Transform one candidate string.
    fn transform(&self, input: String) -> String;
}

/// An observational callback invoked once per distinct, non-empty
/// post-transform candidate. Has no influence on the produced item.
#[async_trait]
pub trait SideEffect: Send + Sync {
    /// Observe one candidate.
    async fn observe(&self, candidate: &str);
}

// ---------------------------------------------------------------------------
// Built-in transformer / side effect
// ---------------------------------------------------------------------------

/// Applies the shared name-normalization function to each candidate.
pub struct NormalizeTransformer;

impl Transformer for NormalizeTransformer {
    fn transform(&self, input: String) -> String {
        cnsearch_shared::normalize(&input)
    }
}

/// Logs every crawled candidate name.
pub struct LogSideEffect;

#[async_trait]
impl SideEffect for LogSideEffect {
    async fn observe(&self, candidate: &str) {
        info!(name = %candidate, "crawled candidate name");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_transformer_collapses_whitespace() {
        let out = NormalizeTransformer.transform("  Acme \n Corp  ".into());
        assert_eq!(out, "Acme Corp");
    }
}
