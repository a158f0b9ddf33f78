//! Topic classification by trigger-keyword membership.

use crate::config::{PipelineConfig, TopicMatch};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
enum Trigger {
    Substring(String),
    Word(Regex),
}

impl Trigger {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Trigger::Substring(keyword) => lowered.contains(keyword.as_str()),
            Trigger::Word(re) => re.is_match(lowered),
        }
    }
}

/// Compiled topic map. Each topic is tested independently.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    topics: BTreeMap<String, Vec<Trigger>>,
}

impl TopicClassifier {
    /// Compile the topic map.
    ///
    /// Topic names are kept exactly as given, so every name a post carries
    /// is a key of `topics`. Trigger keywords are trimmed and lower-cased;
    /// blank ones are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a whole-word keyword cannot be
    /// compiled into a pattern.
    pub fn new(topics: &BTreeMap<String, Vec<String>>, mode: TopicMatch) -> Result<Self, ConfigError> {
        let mut compiled = BTreeMap::new();
        for (topic, keywords) in topics {
            let mut triggers = Vec::new();
            for keyword in keywords.iter().map(|k| k.trim().to_lowercase()) {
                if keyword.is_empty() {
                    continue;
                }
                triggers.push(match mode {
                    TopicMatch::Substring => Trigger::Substring(keyword),
                    TopicMatch::WholeWord => {
                        let re = Regex::new(&format!(r"\b{}\b", regex::escape(&keyword)))
                            .map_err(|e| {
                                ConfigError::Invalid(format!("topic {topic:?} keyword {keyword:?}: {e}"))
                            })?;
                        Trigger::Word(re)
                    }
                });
            }
            compiled.insert(topic.clone(), triggers);
        }
        Ok(Self { topics: compiled })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(&config.topics, config.topic_match)
    }

    /// Topics with at least one trigger keyword present in `text`.
    pub fn classify(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.topics
            .iter()
            .filter(|(_, triggers)| triggers.iter().any(|t| t.matches(&lowered)))
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }
}
