//! # Blog Explorer
//!
//! Crawls a blog listing page, extracts each article's title and main text,
//! annotates posts with keyword tags and topic labels, and builds a
//! word-frequency cloud over the whole corpus.
//!
//! ## Architecture
//!
//! 1. **Indexing**: fetch the listing page and discover article URLs
//! 2. **Fetching**: download articles in order until N posts succeed
//! 3. **Annotating**: derive tags and topics from each post's content
//! 4. **Visualizing**: weigh words across the corpus and render an SVG cloud
//!
//! The result is an immutable [`Snapshot`]; a [`SnapshotHandle`] publishes
//! it to readers and swaps in rebuilt snapshots. [`PostFilter`] implements
//! the keyword / tag / topic query used by the front end.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod snapshot;
pub mod utils;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use filter::PostFilter;
pub use models::{Corpus, Post};
pub use snapshot::{Snapshot, SnapshotHandle};
