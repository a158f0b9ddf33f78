//! Keyword tag extraction.
//!
//! A candidate word is a maximal ASCII-alphabetic run of at least
//! `min_word_len` letters bounded by word boundaries. Candidates are
//! lower-cased and dropped if they appear in the stopword set.

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Word-shape pattern plus stopword set, shared by tagging and the
/// frequency visualizer.
#[derive(Debug, Clone)]
pub struct WordFilter {
    pattern: Regex,
    stopwords: Arc<HashSet<String>>,
}

impl WordFilter {
    /// Compile the word pattern for runs of at least `min_word_len` letters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the pattern cannot be compiled,
    /// which happens for absurdly large lengths.
    pub fn new(min_word_len: usize, stopwords: HashSet<String>) -> Result<Self, ConfigError> {
        let pattern = Regex::new(&format!(r"\b[a-zA-Z]{{{},}}\b", min_word_len.max(1))).map_err(|e| {
            ConfigError::Invalid(format!("min_word_len {min_word_len} gives no usable word pattern: {e}"))
        })?;
        Ok(Self {
            pattern,
            stopwords: Arc::new(stopwords),
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(config.min_word_len, config.stopword_set())
    }

    /// Lower-cased, stopword-filtered candidate words in text order.
    pub fn words<'t>(&'t self, lowered: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.pattern
            .find_iter(lowered)
            .map(|m| m.as_str())
            .filter(|w| !self.stopwords.contains(*w))
    }
}

/// The full sorted, de-duplicated tag set for `text`.
pub fn extract_tags(filter: &WordFilter, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    filter
        .words(&lowered)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The first `max_tags` entries of [`extract_tags`].
pub fn post_tags(filter: &WordFilter, text: &str, max_tags: usize) -> Vec<String> {
    let mut tags = extract_tags(filter, text);
    tags.truncate(max_tags);
    tags
}
