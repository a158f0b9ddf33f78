//! Article link discovery on a listing page.

use itertools::Itertools;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

/// Options for turning listing hrefs into article URLs.
#[derive(Debug, Clone)]
pub struct LinkRules<'a> {
    pub base: &'a Url,
    /// Resolved URL path must contain this.
    pub path_filter: &'a str,
    pub strip_query: bool,
}

/// Resolve `href` against the base URL and normalize it.
///
/// The fragment is always dropped; the query only when `strip_query` is set.
/// Returns `None` for unparsable or non-http(s) targets.
pub fn normalize_link(base: &Url, href: &str, strip_query: bool) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    if strip_query {
        url.set_query(None);
    }
    Some(url)
}

/// Collect article links from a listing page.
///
/// Every `a[href]` is resolved against the base URL and normalized; links
/// whose resolved path does not contain the path filter are dropped.
///
/// # Arguments
///
/// * `markup` - Raw HTML of the listing page
/// * `rules` - Base URL, path filter and query handling
///
/// # Returns
///
/// Absolute, de-duplicated URLs in first-seen order. A listing without
/// matching links yields an empty list.
///
/// # Examples
///
/// ```ignore
/// let base = Url::parse("https://blog.test")?;
/// let rules = LinkRules { base: &base, path_filter: "/nl/blog/", strip_query: true };
/// let links = discover_links(r#"<a href="/nl/blog/a?p=2#top">A</a>"#, &rules);
/// assert_eq!(links, vec!["https://blog.test/nl/blog/a"]);
/// ```
#[instrument(level = "info", skip_all, fields(base = %rules.base, path_filter = rules.path_filter))]
pub fn discover_links(markup: &str, rules: &LinkRules<'_>) -> Vec<String> {
    let document = Html::parse_document(markup);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let links: Vec<String> = document
        .select(&anchor_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| normalize_link(rules.base, href, rules.strip_query))
        .filter(|url| url.path().contains(rules.path_filter))
        .map(String::from)
        .unique()
        .collect();

    info!(count = links.len(), "Discovered article links");
    debug!(urls = ?links, "Article links");
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.academictransfer.com").unwrap()
    }

    fn discover(markup: &str, strip_query: bool) -> Vec<String> {
        let base = base();
        discover_links(
            markup,
            &LinkRules {
                base: &base,
                path_filter: "/nl/blog/",
                strip_query,
            },
        )
    }

    #[test]
    fn test_relative_and_absolute_links_resolve() {
        let html = r#"
            <a href="/nl/blog/first-post/">First</a>
            <a href="https://www.academictransfer.com/nl/blog/second-post/">Second</a>
            <a href="/en/jobs/">Jobs</a>
        "#;
        assert_eq!(
            discover(html, true),
            vec![
                "https://www.academictransfer.com/nl/blog/first-post/",
                "https://www.academictransfer.com/nl/blog/second-post/",
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse_in_first_seen_order() {
        let html = r#"
            <a href="/nl/blog/b/">B</a>
            <a href="/nl/blog/a/">A</a>
            <a href="https://www.academictransfer.com/nl/blog/b/">B again</a>
            <a href="/nl/blog/a/#comments">A comments</a>
        "#;
        assert_eq!(
            discover(html, true),
            vec![
                "https://www.academictransfer.com/nl/blog/b/",
                "https://www.academictransfer.com/nl/blog/a/",
            ]
        );
    }

    #[test]
    fn test_query_strings_collapse_when_stripped() {
        let html = r#"
            <a href="/nl/blog/post/?utm_source=home">One</a>
            <a href="/nl/blog/post/?utm_source=footer">Two</a>
        "#;
        assert_eq!(
            discover(html, true),
            vec!["https://www.academictransfer.com/nl/blog/post/"]
        );
        assert_eq!(discover(html, false).len(), 2);
    }

    #[test]
    fn test_no_matching_links_is_empty_not_error() {
        let html = r#"<a href="/about">About</a><a>No href</a><p>text</p>"#;
        assert!(discover(html, true).is_empty());
        assert!(discover("", true).is_empty());
    }

    #[test]
    fn test_non_http_targets_are_ignored() {
        let html = r#"
            <a href="mailto:blog@example.com?subject=/nl/blog/">Mail</a>
            <a href="javascript:void('/nl/blog/')">JS</a>
        "#;
        assert!(discover(html, true).is_empty());
    }

    #[test]
    fn test_normalize_link_rejects_empty_href() {
        assert!(normalize_link(&base(), "   ", true).is_none());
        assert_eq!(
            normalize_link(&base(), "nl/blog/x", true).unwrap().as_str(),
            "https://www.academictransfer.com/nl/blog/x"
        );
    }
}
