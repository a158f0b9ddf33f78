//! Immutable pipeline output and the handle that publishes it.
//!
//! A [`Snapshot`] is built once and never mutated. A rebuild produces a new
//! snapshot and [`SnapshotHandle::replace`] swaps it in; readers holding the
//! previous `Arc<Snapshot>` keep a consistent view.

use crate::analysis::TextAnalyzer;
use crate::analysis::frequency::{FrequencyVisualizer, Visualization};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::filter::PostFilter;
use crate::models::{Corpus, Post};
use crate::scrapers::article::ArticleExtractor;
use crate::scrapers::corpus::{BuildReport, CorpusBuilder};
use crate::scrapers::fetcher::Fetch;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub built_at: DateTime<Utc>,
    pub corpus: Corpus,
    pub visualization: Visualization,
    pub report: BuildReport,
    /// Topic names available for filtering.
    pub topics: Vec<String>,
}

impl Snapshot {
    /// Crawl, annotate, and visualize. Fails only on configuration errors or
    /// when the listing page cannot be fetched.
    #[instrument(level = "info", skip_all, fields(base = %config.base_url))]
    pub async fn build<F: Fetch>(config: &PipelineConfig, fetcher: &F) -> Result<Self> {
        config.validate()?;
        let extractor = ArticleExtractor::from_config(config)?;
        let analyzer = TextAnalyzer::from_config(config)?;
        let visualizer = FrequencyVisualizer::from_config(config)?;

        let (corpus, report) = CorpusBuilder::new(
            fetcher,
            &extractor,
            &analyzer,
            config.base()?,
            config.listing_url()?,
        )
        .path_filter(config.path_filter.clone())
        .strip_query(config.strip_query)
        .max_posts(config.max_posts)
        .build()
        .await?;

        let visualization = visualizer.visualize_or_placeholder(&corpus);
        let topics = analyzer
            .topic_classifier()
            .topic_names()
            .map(str::to_string)
            .collect();

        info!(
            posts = corpus.len(),
            terms = visualization.top_terms.len(),
            "Snapshot built"
        );
        Ok(Self {
            built_at: Utc::now(),
            corpus,
            visualization,
            report,
            topics,
        })
    }

    pub fn filter(&self, filter: &PostFilter) -> Vec<&Post> {
        filter.apply(&self.corpus)
    }
}

/// Shared, swappable reference to the current snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.inner.read().clone()
    }

    /// Publish `snapshot`, returning the one it replaced.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.swap(Arc::new(snapshot))
    }

    fn swap(&self, next: Arc<Snapshot>) -> Arc<Snapshot> {
        let prev = std::mem::replace(&mut *self.inner.write(), next);
        info!(previous_built_at = %prev.built_at, "Snapshot replaced");
        prev
    }

    /// Build a fresh snapshot and swap it in. On failure the current
    /// snapshot stays published.
    pub async fn rebuild<F: Fetch>(&self, config: &PipelineConfig, fetcher: &F) -> Result<Arc<Snapshot>> {
        let next = Arc::new(Snapshot::build(config, fetcher).await?);
        self.swap(Arc::clone(&next));
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::scrapers::corpus::tests::{BASE, StubFetcher, article};

    fn config() -> PipelineConfig {
        PipelineConfig {
            base_url: BASE.to_string(),
            ..Default::default()
        }
    }

    fn site(body: &str) -> StubFetcher {
        StubFetcher::default()
            .page(
                &format!("{BASE}/nl/blog/"),
                r#"<a href="/nl/blog/one">1</a><a href="/nl/blog/two">2</a>"#,
            )
            .page(&format!("{BASE}/nl/blog/one"), &article("One", body))
            .page(&format!("{BASE}/nl/blog/two"), &article("Two", "conference network"))
    }

    #[tokio::test]
    async fn test_build_produces_corpus_and_cloud() {
        let snapshot = Snapshot::build(&config(), &site("thesis research thesis")).await.unwrap();
        assert_eq!(snapshot.corpus.len(), 2);
        assert_eq!(snapshot.visualization.top_terms[0], "thesis");
        assert_eq!(snapshot.topics, vec!["career", "events", "phd", "research"]);
    }

    #[tokio::test]
    async fn test_blank_corpus_gets_placeholder_cloud() {
        let fetcher = StubFetcher::default()
            .page(&format!("{BASE}/nl/blog/"), r#"<a href="/nl/blog/one">1</a>"#)
            .page(&format!("{BASE}/nl/blog/one"), &article("One", "   "));
        let snapshot = Snapshot::build(&config(), &fetcher).await.unwrap();
        assert_eq!(snapshot.corpus.len(), 1);
        assert!(snapshot.visualization.is_placeholder());
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let err = Snapshot::build(&config(), &StubFetcher::default()).await.unwrap_err();
        assert!(matches!(err, Error::Listing(_)));
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_replace_keeps_old_readers_consistent() {
        let first = Snapshot::build(&config(), &site("alpha words")).await.unwrap();
        let handle = SnapshotHandle::new(first);
        let reader = handle.current();

        let next = handle.rebuild(&config(), &site("bravo words")).await.unwrap();
        assert!(next.corpus.posts()[0].content.contains("bravo"));
        assert!(reader.corpus.posts()[0].content.contains("alpha"));
        assert!(Arc::ptr_eq(&handle.current(), &next));
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_current_snapshot() {
        let handle = SnapshotHandle::new(Snapshot::build(&config(), &site("alpha")).await.unwrap());
        let before = handle.current();
        assert!(handle.rebuild(&config(), &StubFetcher::default()).await.is_err());
        assert!(Arc::ptr_eq(&before, &handle.current()));
    }

    #[tokio::test]
    async fn test_case_colliding_topics_fail_before_fetching() {
        let mut config = config();
        config.topics = [("PhD", "thesis"), ("phd", "supervisor")]
            .into_iter()
            .map(|(topic, word)| (topic.to_string(), vec![word.to_string()]))
            .collect();
        let fetcher = site("my thesis draft");
        let err = Snapshot::build(&config, &fetcher).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_huge_min_word_len_is_a_config_error() {
        let config = PipelineConfig {
            min_word_len: 1_000_000,
            ..config()
        };
        let err = Snapshot::build(&config, &site("alpha")).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    mod http {
        use super::*;
        use crate::scrapers::fetcher::HttpFetcher;
        use std::time::Duration;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn http_config(server: &MockServer) -> PipelineConfig {
            PipelineConfig {
                base_url: server.uri(),
                request_timeout_secs: 5,
                ..Default::default()
            }
        }

        async fn page(server: &MockServer, at: &str, status: u16, body: &str) {
            Mock::given(method("GET"))
                .and(path(at))
                .respond_with(ResponseTemplate::new(status).set_body_string(body))
                .mount(server)
                .await;
        }

        #[tokio::test]
        async fn test_end_to_end_over_http() {
            let server = MockServer::start().await;
            page(
                &server,
                "/nl/blog/",
                200,
                r#"<a href="/nl/blog/a?x=1">A</a><a href="/nl/blog/a?x=2">A</a>
                   <a href="/nl/blog/down">Down</a><a href="/nl/blog/b">B</a>"#,
            )
            .await;
            page(&server, "/nl/blog/a", 200, &article("A", "Vacancy for a research position")).await;
            page(&server, "/nl/blog/down", 503, "").await;
            page(&server, "/nl/blog/b", 200, "<html><body><main>Network drinks at the conference</main></body></html>").await;

            let config = http_config(&server);
            let fetcher = HttpFetcher::new(Duration::from_secs(5), "test").unwrap();
            let snapshot = Snapshot::build(&config, &fetcher).await.unwrap();

            let titles: Vec<_> = snapshot.corpus.iter().map(|p| p.title.as_str()).collect();
            assert_eq!(titles, vec!["A", "Untitled"]);
            assert_eq!(snapshot.report.fetch_failures, 1);
            assert!(snapshot.corpus.posts()[0].has_topic("career"));
            assert!(snapshot.corpus.posts()[1].has_topic("events"));
        }

        #[tokio::test]
        async fn test_listing_http_500_is_fatal() {
            let server = MockServer::start().await;
            page(&server, "/nl/blog/", 500, "oops").await;

            let fetcher = HttpFetcher::new(Duration::from_secs(5), "test").unwrap();
            let err = Snapshot::build(&http_config(&server), &fetcher).await.unwrap_err();
            assert!(matches!(err, Error::Listing(_)));
            assert!(err.to_string().contains("500"));
        }
    }
}
