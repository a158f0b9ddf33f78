//! Post filtering for the explorer front end.
//!
//! Filters are case-insensitive and compose with AND. A missing or blank
//! filter imposes no constraint.

use crate::models::{Corpus, Post};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostFilter {
    /// Substring of the title or the content.
    pub keyword: Option<String>,
    /// Exact member of the post's tags.
    pub tag: Option<String>,
    /// Member of the post's topics, compared case-insensitively.
    pub topic: Option<String>,
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

impl PostFilter {
    /// Build a filter from optional raw values, as they arrive from the
    /// command line. Values are trimmed and lower-cased; blank ones become
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let filter = PostFilter::new(Some(" Thesis "), None, Some(""));
    /// assert_eq!(filter.keyword.as_deref(), Some("thesis"));
    /// assert!(filter.topic.is_none());
    /// ```
    pub fn new(keyword: Option<&str>, tag: Option<&str>, topic: Option<&str>) -> Self {
        Self {
            keyword: normalize(keyword),
            tag: normalize(tag),
            topic: normalize(topic),
        }
    }

    pub fn keyword(mut self, keyword: &str) -> Self {
        self.keyword = normalize(Some(keyword));
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = normalize(Some(tag));
        self
    }

    pub fn topic(mut self, topic: &str) -> Self {
        self.topic = normalize(Some(topic));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.tag.is_none() && self.topic.is_none()
    }

    pub fn matches(&self, post: &Post) -> bool {
        // Fields may have been set directly; normalize again at match time.
        let keyword = normalize(self.keyword.as_deref());
        let tag = normalize(self.tag.as_deref());
        let topic = normalize(self.topic.as_deref());

        if let Some(k) = keyword {
            if !post.title.to_lowercase().contains(&k) && !post.content.to_lowercase().contains(&k) {
                return false;
            }
        }
        if let Some(t) = tag {
            if !post.has_tag(&t) {
                return false;
            }
        }
        if let Some(t) = topic {
            if !post.topics.iter().any(|name| name.to_lowercase() == t) {
                return false;
            }
        }
        true
    }

    /// Matching posts in corpus order.
    pub fn apply<'c>(&self, corpus: &'c Corpus) -> Vec<&'c Post> {
        corpus.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post;

    fn corpus() -> Corpus {
        let mut c = Corpus::with_capacity(4);
        c.push(post("https://a/1", "PhD Life", "Writing a thesis", &["thesis", "writing"], &["phd"]));
        c.push(post("https://a/2", "Jobs", "A vacancy in research", &["research", "vacancy"], &["career", "research"]));
        c.push(post("https://a/3", "Conference recap", "Thesis talks", &["talks", "thesis"], &["events", "phd"]));
        c.push(post("https://a/4", "Misc", "", &[], &[]));
        c
    }

    fn links(posts: Vec<&Post>) -> Vec<&str> {
        posts.into_iter().map(|p| p.link.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let c = corpus();
        let f = PostFilter::new(Some(""), Some("  "), None);
        assert!(f.is_empty());
        assert_eq!(f.apply(&c).len(), 4);
    }

    #[test]
    fn test_keyword_matches_title_or_content_case_insensitively() {
        let c = corpus();
        assert_eq!(links(PostFilter::default().keyword("THESIS").apply(&c)), vec!["https://a/1", "https://a/3"]);
        assert_eq!(links(PostFilter::default().keyword("jobs").apply(&c)), vec!["https://a/2"]);
    }

    #[test]
    fn test_tag_and_topic_are_exact_members() {
        let c = corpus();
        assert_eq!(links(PostFilter::default().tag("Thesis").apply(&c)), vec!["https://a/1", "https://a/3"]);
        assert!(PostFilter::default().tag("thes").apply(&c).is_empty());
        assert_eq!(links(PostFilter::default().topic("career").apply(&c)), vec!["https://a/2"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let c = corpus();
        let by_tag = PostFilter::default().tag("thesis").apply(&c);
        let by_both = PostFilter::default().tag("thesis").topic("events").apply(&c);
        assert!(by_both.iter().all(|p| by_tag.contains(p)));
        assert_eq!(links(by_both), vec!["https://a/3"]);

        let none = PostFilter::new(Some("vacancy"), Some("thesis"), None).apply(&c);
        assert!(none.is_empty());
    }

    #[test]
    fn test_directly_set_fields_are_normalized() {
        let c = corpus();
        let f = PostFilter {
            topic: Some(" PHD ".to_string()),
            ..Default::default()
        };
        assert_eq!(f.apply(&c).len(), 2);
    }

    #[test]
    fn test_topic_filter_matches_mixed_case_topic_names() {
        let mut c = Corpus::with_capacity(1);
        c.push(post("https://a/1", "Draft", "thesis", &[], &["PhD"]));
        assert_eq!(links(PostFilter::default().topic("phd").apply(&c)), vec!["https://a/1"]);
    }
}
