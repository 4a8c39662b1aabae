//! Shared types, error model, and configuration for cnsearch.
//!
//! This crate is the foundation depended on by all other cnsearch crates.
//! It provides:
//! - [`CnSearchError`] — the unified error type
//! - Domain types ([`Item`], [`Match`], [`MatchMap`], [`SearchResult`],
//!   [`TargetField`], [`Fuzziness`])
//! - Configuration ([`AppConfig`], config loading)
//! - [`normalize`] — the pure name-normalization function

pub mod config;
pub mod error;
pub mod text;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlConfig, DiscoveryConfig, IndexConfig, ServerConfig, load_config,
    load_config_from,
};
pub use error::{CnSearchError, Result};
pub use text::normalize;
pub use types::{Fuzziness, Item, Match, MatchMap, SearchResult, TargetField};
