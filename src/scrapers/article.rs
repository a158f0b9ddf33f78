//! Title and main-content extraction from an article page.
//!
//! The content block is chosen by an ordered list of [`SelectorRule`]s;
//! the first rule that matches anything wins. If none match, the page is an
//! [`ExtractionMiss`]. The title is independent of that and falls back to a
//! sentinel.

use crate::config::PipelineConfig;
use crate::error::{ConfigError, ExtractionMiss};
use crate::models::Article;
use crate::utils::collapse_whitespace;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, instrument};

/// Elements whose text is never visible content.
const HIDDEN: &[&str] = &["script", "style", "noscript", "template"];

/// A compiled content selector with its source text kept for logging.
#[derive(Debug, Clone)]
pub struct SelectorRule {
    pub css: String,
    selector: Selector,
}

impl SelectorRule {
    /// Compile one CSS selector.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Selector`] naming the selector when it does not parse.
    pub fn parse(css: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(css).map_err(|e| ConfigError::Selector {
            selector: css.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            css: css.to_string(),
            selector,
        })
    }

    fn first_match<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.selector).next()
    }
}

#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    rules: Vec<SelectorRule>,
    untitled: String,
    title_selector: Selector,
}

impl ArticleExtractor {
    /// Build an extractor from content selectors in priority order.
    ///
    /// # Arguments
    ///
    /// * `selectors` - CSS selectors for the main content block, highest priority first
    /// * `untitled` - Title used when a page has no non-empty `<title>`
    ///
    /// # Returns
    ///
    /// The extractor, or a [`ConfigError`] if the list is empty or any
    /// selector fails to parse.
    pub fn new(selectors: &[String], untitled: &str) -> Result<Self, ConfigError> {
        if selectors.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one content selector is required".into(),
            ));
        }
        let rules = selectors
            .iter()
            .map(|css| SelectorRule::parse(css))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            untitled: untitled.to_string(),
            title_selector: Selector::parse("title").unwrap(),
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(&config.content_selectors, &config.untitled_title)
    }

    /// Pull the title and main-content text out of one article page.
    ///
    /// Rules are tried in priority order and the first one that matches
    /// anywhere in the document wins. An empty matched block is still a
    /// success with empty content.
    ///
    /// # Arguments
    ///
    /// * `markup` - Raw HTML of the article page
    ///
    /// # Returns
    ///
    /// The [`Article`], or an [`ExtractionMiss`] when no rule matches.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let extractor = ArticleExtractor::new(&["main".to_string()], "Untitled")?;
    /// let article = extractor.extract("<title>Hi</title><main>Body <b>text</b></main>")?;
    /// assert_eq!(article.title, "Hi");
    /// assert_eq!(article.content, "Body text");
    /// ```
    #[instrument(level = "debug", skip_all)]
    pub fn extract(&self, markup: &str) -> Result<Article, ExtractionMiss> {
        let document = Html::parse_document(markup);

        let (rule, block) = self
            .rules
            .iter()
            .find_map(|rule| rule.first_match(&document).map(|el| (rule, el)))
            .ok_or(ExtractionMiss {
                tried: self.rules.len(),
            })?;

        let content = visible_text(block);
        let title = self.title(&document);
        debug!(selector = %rule.css, %title, chars = content.len(), "Extracted article");
        Ok(Article { title, content })
    }

    fn title(&self, document: &Html) -> String {
        document
            .select(&self.title_selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.untitled.clone())
    }
}

/// Whitespace-collapsed text of `root`, skipping script-like subtrees.
pub fn visible_text(root: ElementRef<'_>) -> String {
    let pieces = root.descendants().filter_map(|node| match node.value() {
        Node::Text(text) => {
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| HIDDEN.contains(&e.name()))
            });
            (!hidden).then_some(&**text)
        }
        _ => None,
    });
    collapse_whitespace(&pieces.collect::<Vec<_>>().join(" "))
}
