//! Resolution pipeline core: match merging and the search orchestrator.
//!
//! This crate sequences the external collaborators — index store, web
//! discovery, crawl pipeline — into the resolve flow:
//! index lookup → merge → (fallback) discover → crawl → re-index.

pub mod merge;
pub mod resolver;

pub use merge::merge_matches;
pub use resolver::Resolver;
