//! Corpus construction.
//!
//! A [`CorpusBuilder`] runs exactly once and moves through
//! `Empty -> FetchingListing -> FetchingArticles -> Annotating -> Ready`.
//! Only a listing failure is fatal. Article fetch failures, extraction misses,
//! and duplicate links are logged and skipped; they never count toward the
//! target size.

use crate::analysis::TextAnalyzer;
use crate::error::ListingFetchError;
use crate::models::{Article, Corpus, Post};
use crate::scrapers::article::ArticleExtractor;
use crate::scrapers::fetcher::Fetch;
use crate::scrapers::links::{LinkRules, discover_links, normalize_link};
use crate::utils::truncate_for_log;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Empty,
    FetchingListing,
    FetchingArticles,
    Annotating,
    Ready,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildState::Empty => "empty",
            BuildState::FetchingListing => "fetching_listing",
            BuildState::FetchingArticles => "fetching_articles",
            BuildState::Annotating => "annotating",
            BuildState::Ready => "ready",
        };
        f.write_str(s)
    }
}

/// Counters describing how a build went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub links_discovered: usize,
    pub duplicates_skipped: usize,
    pub fetch_failures: usize,
    pub extraction_misses: usize,
    pub posts: usize,
}

pub struct CorpusBuilder<'a, F: Fetch> {
    fetcher: &'a F,
    extractor: &'a ArticleExtractor,
    analyzer: &'a TextAnalyzer,
    base: Url,
    listing_url: Url,
    path_filter: String,
    strip_query: bool,
    max_posts: usize,
    state: BuildState,
}

impl<'a, F: Fetch> CorpusBuilder<'a, F> {
    pub fn new(
        fetcher: &'a F,
        extractor: &'a ArticleExtractor,
        analyzer: &'a TextAnalyzer,
        base: Url,
        listing_url: Url,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            analyzer,
            base,
            listing_url,
            path_filter: "/".to_string(),
            strip_query: true,
            max_posts: 10,
            state: BuildState::Empty,
        }
    }

    pub fn path_filter(mut self, path_filter: impl Into<String>) -> Self {
        self.path_filter = path_filter.into();
        self
    }

    pub fn strip_query(mut self, strip_query: bool) -> Self {
        self.strip_query = strip_query;
        self
    }

    pub fn max_posts(mut self, max_posts: usize) -> Self {
        self.max_posts = max_posts;
        self
    }

    fn transition(&mut self, next: BuildState) {
        info!(from = %self.state, to = %next, "Corpus build state change");
        self.state = next;
    }

    /// Run the build to completion, consuming the builder.
    #[instrument(level = "info", skip_all, fields(listing = %self.listing_url, max_posts = self.max_posts))]
    pub async fn build(mut self) -> Result<(Corpus, BuildReport), ListingFetchError> {
        let t0 = Instant::now();
        let mut report = BuildReport::default();

        self.transition(BuildState::FetchingListing);
        let listing = match self.fetcher.fetch(self.listing_url.as_str()).await {
            Ok(markup) => markup,
            Err(e) => {
                error!(url = %e.url, error = %e.cause, "Listing fetch failed; aborting build");
                return Err(ListingFetchError(e));
            }
        };

        let links = discover_links(
            &listing,
            &LinkRules {
                base: &self.base,
                path_filter: &self.path_filter,
                strip_query: self.strip_query,
            },
        );
        report.links_discovered = links.len();

        self.transition(BuildState::FetchingArticles);
        let extracted = self.fetch_articles(links, &mut report).await;

        self.transition(BuildState::Annotating);
        let mut corpus = Corpus::with_capacity(self.max_posts);
        for (link, article) in extracted {
            let annotations = self.analyzer.annotate(&article.content);
            debug!(%link, tags = ?annotations.tags, topics = ?annotations.topics, "Annotated post");
            corpus.push(Post {
                title: article.title,
                link,
                content: article.content,
                tags: annotations.tags,
                topics: annotations.topics,
            });
        }
        report.posts = corpus.len();

        self.transition(BuildState::Ready);
        info!(
            posts = report.posts,
            discovered = report.links_discovered,
            duplicates = report.duplicates_skipped,
            fetch_failures = report.fetch_failures,
            extraction_misses = report.extraction_misses,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Corpus ready"
        );
        Ok((corpus, report))
    }

    /// Fetch and extract links in order until `max_posts` succeed.
    async fn fetch_articles(
        &self,
        links: Vec<String>,
        report: &mut BuildReport,
    ) -> Vec<(String, Article)> {
        let mut seen: HashSet<String> = HashSet::new();
        if let Some(listing) =
            normalize_link(&self.base, self.listing_url.as_str(), self.strip_query)
        {
            seen.insert(listing.into());
        }

        let mut extracted = Vec::new();
        for link in links {
            if extracted.len() >= self.max_posts {
                debug!(max_posts = self.max_posts, "Target post count reached");
                break;
            }
            if !seen.insert(link.clone()) {
                report.duplicates_skipped += 1;
                debug!(%link, "Skipping already seen link");
                continue;
            }

            let markup = match self.fetcher.fetch(&link).await {
                Ok(markup) => markup,
                Err(e) => {
                    report.fetch_failures += 1;
                    warn!(url = %e.url, error = %truncate_for_log(&e.cause, 300), "Article fetch failed; skipping");
                    continue;
                }
            };

            match self.extractor.extract(&markup) {
                Ok(article) => {
                    debug!(%link, title = %article.title, "Fetched article");
                    extracted.push((link, article));
                }
                Err(miss) => {
                    report.extraction_misses += 1;
                    warn!(url = %link, error = %miss, "No content region; skipping article");
                }
            }
        }

        info!(count = extracted.len(), "Fetched article contents");
        extracted
    }
}
