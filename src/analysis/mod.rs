//! Lightweight text analysis over extracted article content.
//!
//! # Submodules
//!
//! - [`stopwords`]: built-in English stopword list
//! - [`tags`]: keyword tags from length- and stopword-filtered words
//! - [`topics`]: topic labels from trigger-keyword membership
//! - [`frequency`]: corpus-wide word weights and the word-cloud artifact
//!
//! There is no stemming or part-of-speech tagging; words are matched as
//! lower-cased ASCII letter runs.

pub mod frequency;
pub mod stopwords;
pub mod tags;
pub mod topics;

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use std::collections::BTreeSet;
use tags::WordFilter;
use topics::TopicClassifier;

/// Tags and topics derived from a post's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotations {
    pub tags: Vec<String>,
    pub topics: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    words: WordFilter,
    topics: TopicClassifier,
    max_tags: usize,
}

impl TextAnalyzer {
    pub fn new(words: WordFilter, topics: TopicClassifier, max_tags: usize) -> Self {
        Self {
            words,
            topics,
            max_tags,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            WordFilter::from_config(config)?,
            TopicClassifier::from_config(config)?,
            config.max_tags,
        ))
    }

    pub fn annotate(&self, content: &str) -> Annotations {
        Annotations {
            tags: tags::post_tags(&self.words, content, self.max_tags),
            topics: self.topics.classify(content),
        }
    }

    pub fn topic_classifier(&self) -> &TopicClassifier {
        &self.topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_sample_sentence() {
        let analyzer = TextAnalyzer::from_config(&PipelineConfig::default()).unwrap();
        let a = analyzer.annotate(
            "This research describes a new methodology for career development in academia.",
        );
        assert_eq!(a.tags.len(), 5);
        assert!(!a.tags.contains(&"research".to_string()));
        assert!(a.topics.contains("research"));
        assert!(a.topics.contains("career"));
    }

    #[test]
    fn test_annotate_respects_max_tags() {
        let config = PipelineConfig {
            max_tags: 2,
            ..Default::default()
        };
        let a = TextAnalyzer::from_config(&config).unwrap().annotate("zebra apple mango peach");
        assert_eq!(a.tags, vec!["apple", "mango"]);
    }

    #[test]
    fn test_from_config_propagates_word_pattern_error() {
        let config = PipelineConfig {
            min_word_len: 1_000_000,
            ..Default::default()
        };
        assert!(matches!(TextAnalyzer::from_config(&config), Err(ConfigError::Invalid(_))));
    }
}
