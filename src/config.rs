//! Pipeline configuration.
//!
//! Every tunable of the crawl and the analysis lives in [`PipelineConfig`].
//! Values come from built-in defaults, optionally overlaid by a YAML file and
//! finally by command-line flags (see [`crate::cli`]).
//!
//! ```yaml
//! base_url: https://www.academictransfer.com
//! listing_path: /nl/blog/
//! max_posts: 10
//! topic_match: whole_word
//! extra_stopwords: [academictransfer]
//! ```

use crate::analysis::stopwords::default_stopwords;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Longest accepted `min_word_len`. No real word is longer, and the
/// counted repetition in the word pattern must stay small.
pub const MAX_WORD_LEN: usize = 64;

/// How topic trigger keywords are matched against post content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicMatch {
    /// Plain substring containment: `phd` matches inside `graphd`.
    #[default]
    Substring,
    /// The keyword must appear as a whole word.
    WholeWord,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Site root; relative links are resolved against it.
    pub base_url: String,
    /// Path of the blog listing page, relative to `base_url`.
    pub listing_path: String,
    /// Only links whose path contains this string are article candidates.
    pub path_filter: String,
    /// Target corpus size N.
    pub max_posts: usize,
    /// CSS selectors for the main content block, highest priority first.
    pub content_selectors: Vec<String>,
    pub untitled_title: String,
    pub min_word_len: usize,
    pub max_tags: usize,
    /// Replaces the built-in stopword list when set.
    pub stopwords: Option<Vec<String>>,
    pub extra_stopwords: Vec<String>,
    pub topics: BTreeMap<String, Vec<String>>,
    pub topic_match: TopicMatch,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub top_terms: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Drop query strings when normalizing article links.
    pub strip_query: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.academictransfer.com".to_string(),
            listing_path: "/nl/blog/".to_string(),
            path_filter: "/nl/blog/".to_string(),
            max_posts: 10,
            content_selectors: vec![
                "div.article__content".to_string(),
                ".blog__content".to_string(),
                "main".to_string(),
            ],
            untitled_title: "Untitled".to_string(),
            min_word_len: 5,
            max_tags: 5,
            stopwords: None,
            extra_stopwords: Vec::new(),
            topics: default_topics(),
            topic_match: TopicMatch::default(),
            canvas_width: 800,
            canvas_height: 400,
            top_terms: 100,
            request_timeout_secs: 30,
            user_agent: concat!("blog_explorer/", env!("CARGO_PKG_VERSION")).to_string(),
            strip_query: true,
        }
    }
}

/// The four built-in topics and their trigger keywords.
pub fn default_topics() -> BTreeMap<String, Vec<String>> {
    [
        ("research", &["research", "method", "publication"][..]),
        ("career", &["career", "vacancy", "job", "position"][..]),
        ("events", &["conference", "presentation", "network"][..]),
        ("phd", &["phd", "supervisor", "thesis", "candidate"][..]),
    ]
    .into_iter()
    .map(|(topic, words)| {
        (
            topic.to_string(),
            words.iter().map(|w| w.to_string()).collect(),
        )
    })
    .collect()
}

impl PipelineConfig {
    /// Load from a YAML file, or fall back to defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_string(),
                    source,
                })?;
                let parsed: Self =
                    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                        path: path.to_string(),
                        source,
                    })?;
                info!(path, "Loaded configuration file");
                parsed
            }
            None => {
                debug!("No config file given; using defaults");
                Self::default()
            }
        };
        config.normalize_topics()?;
        config.validate()?;
        Ok(config)
    }

    /// Lower-case and trim every topic name, so the names posts carry are
    /// exactly the keys of `topics`. Two names that fold to the same key
    /// are rejected rather than silently merged.
    pub fn normalize_topics(&mut self) -> Result<(), ConfigError> {
        let mut normalized = BTreeMap::new();
        for (topic, triggers) in &self.topics {
            let key = topic.trim().to_lowercase();
            if normalized.insert(key.clone(), triggers.clone()).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "topic {topic:?} collides with another topic named {key:?}"
                )));
            }
        }
        self.topics = normalized;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base()?;
        if self.content_selectors.is_empty() {
            return Err(ConfigError::Invalid(
                "content_selectors must not be empty".into(),
            ));
        }
        if self.path_filter.is_empty() {
            return Err(ConfigError::Invalid("path_filter must not be empty".into()));
        }
        if self.min_word_len == 0 || self.min_word_len > MAX_WORD_LEN {
            return Err(ConfigError::Invalid(format!(
                "min_word_len must be between 1 and {MAX_WORD_LEN}, got {}",
                self.min_word_len
            )));
        }
        if self.top_terms == 0 {
            return Err(ConfigError::Invalid("top_terms must be at least 1".into()));
        }
        let mut folded = HashSet::new();
        for topic in self.topics.keys() {
            let key = topic.trim().to_lowercase();
            if key.is_empty() {
                return Err(ConfigError::Invalid("topic names must not be blank".into()));
            }
            if !folded.insert(key) {
                return Err(ConfigError::Invalid(format!(
                    "topic {topic:?} differs from another topic only by case"
                )));
            }
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid(
                "canvas dimensions must be positive".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    pub fn listing_url(&self) -> Result<Url, ConfigError> {
        let base = self.base()?;
        base.join(&self.listing_path)
            .map_err(|source| ConfigError::BaseUrl {
                url: format!("{}{}", self.base_url, self.listing_path),
                source,
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Effective lower-cased stopword set.
    pub fn stopword_set(&self) -> HashSet<String> {
        let mut set: HashSet<String> = match &self.stopwords {
            Some(words) => words.iter().map(|w| w.to_lowercase()).collect(),
            None => default_stopwords().clone(),
        };
        set.extend(self.extra_stopwords.iter().map(|w| w.to_lowercase()));
        set
    }
}
