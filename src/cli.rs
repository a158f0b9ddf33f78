//! Command-line interface definitions for Blog Explorer.
//!
//! Flags override values from the optional YAML config file. Most options
//! can also be given through environment variables.

use crate::config::PipelineConfig;
use crate::filter::PostFilter;
use clap::Parser;

/// Command-line arguments for the Blog Explorer application.
///
/// # Examples
///
/// ```sh
/// # Crawl with defaults and write artifacts to ./site
/// blog_explorer -o ./site
///
/// # Smaller crawl from a config file, listing only career posts
/// blog_explorer -c explorer.yaml --max-posts 5 --topic career
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for snapshot.json and wordcloud.svg
    #[arg(short, long, env = "BLOG_EXPLORER_OUTPUT_DIR", default_value = "./site")]
    pub output_dir: String,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "BLOG_EXPLORER_CONFIG")]
    pub config: Option<String>,

    /// Site root to crawl (overrides the config file)
    #[arg(long, env = "BLOG_EXPLORER_BASE_URL")]
    pub base_url: Option<String>,

    /// Number of posts to collect (overrides the config file)
    #[arg(short = 'n', long)]
    pub max_posts: Option<usize>,

    /// Only list posts whose title or content contains this word
    #[arg(long)]
    pub word: Option<String>,

    /// Only list posts carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only list posts labelled with this topic
    #[arg(long)]
    pub topic: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(max_posts) = self.max_posts {
            config.max_posts = max_posts;
        }
    }

    pub fn post_filter(&self) -> PostFilter {
        PostFilter::new(
            self.word.as_deref(),
            self.tag.as_deref(),
            self.topic.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["blog_explorer"]);
        assert_eq!(cli.output_dir, "./site");
        assert!(cli.config.is_none());
        assert!(cli.post_filter().is_empty());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["blog_explorer", "-o", "/tmp/out", "-c", "x.yaml", "-n", "3"]);
        assert_eq!(cli.output_dir, "/tmp/out");
        assert_eq!(cli.config.as_deref(), Some("x.yaml"));
        assert_eq!(cli.max_posts, Some(3));
    }

    #[test]
    fn test_overrides_and_filter() {
        let cli = Cli::parse_from([
            "blog_explorer",
            "--base-url",
            "https://blog.test",
            "--max-posts",
            "4",
            "--tag",
            "Thesis",
            "--topic",
            "phd",
        ]);
        let mut config = PipelineConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.base_url, "https://blog.test");
        assert_eq!(config.max_posts, 4);

        let filter = cli.post_filter();
        assert_eq!(filter.tag.as_deref(), Some("thesis"));
        assert_eq!(filter.topic.as_deref(), Some("phd"));
        assert!(filter.keyword.is_none());
    }
}
