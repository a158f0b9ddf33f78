//! Data models for ingested blog posts.
//!
//! - [`Article`]: raw extraction result for one page, before annotation
//! - [`Post`]: an article annotated with tags and topics
//! - [`Corpus`]: the ordered, link-unique, bounded collection of posts

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Title and visible body text pulled out of one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub content: String,
}

/// One ingested article.
///
/// Created once by the corpus builder and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    /// Page title, or the configured sentinel when the page declares none.
    pub title: String,
    /// Absolute URL; unique within a [`Corpus`].
    pub link: String,
    /// Plain text of the main content block. May be empty.
    pub content: String,
    /// At most `max_tags` keywords, sorted and unique.
    pub tags: Vec<String>,
    /// Topic names drawn from the configured topic map.
    pub topics: BTreeSet<String>,
}

impl Post {
    /// Whether `tag` is one of this post's tags. Tags are stored
    /// lower-cased, so `tag` should be too.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }
}

/// Ordered collection of posts, deduplicated by link and bounded in size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Corpus {
    posts: Vec<Post>,
    #[serde(skip)]
    capacity: usize,
}

impl Corpus {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            posts: Vec::new(),
            capacity,
        }
    }

    /// Appends a post unless the corpus is full or already holds its link.
    pub(crate) fn push(&mut self, post: Post) -> bool {
        if self.is_full() || self.contains_link(&post.link) {
            return false;
        }
        self.posts.push(post);
        true
    }

    /// True once the corpus holds as many posts as it was built for.
    pub fn is_full(&self) -> bool {
        self.posts.len() >= self.capacity
    }

    pub fn contains_link(&self, link: &str) -> bool {
        self.posts.iter().any(|p| p.link == link)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Distinct tags across the corpus, sorted.
    pub fn all_tags(&self) -> BTreeSet<&str> {
        self.posts
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .collect()
    }

    pub fn links(&self) -> HashSet<&str> {
        self.posts.iter().map(|p| p.link.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

#[cfg(test)]
pub(crate) fn post(link: &str, title: &str, content: &str, tags: &[&str], topics: &[&str]) -> Post {
    Post {
        title: title.to_string(),
        link: link.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
    }
}
