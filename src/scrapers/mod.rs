//! Crawling a blog: fetch, discover, extract, assemble.
//!
//! The pipeline follows a two-phase pattern:
//!
//! 1. **Indexing**: fetch the listing page and discover article URLs
//!    ([`links`])
//! 2. **Fetching**: download each article and pull out its title and main
//!    content ([`fetcher`], [`article`])
//!
//! [`corpus`] drives both phases, annotates the results, and enforces the
//! corpus invariants (unique links, at most N posts).
//!
//! # Common Patterns
//!
//! - Fetches are awaited one at a time, in listing order
//! - Failed fetches and pages without a content region are logged and skipped
//! - Only a failed listing fetch aborts the build

pub mod article;
pub mod corpus;
pub mod fetcher;
pub mod links;
