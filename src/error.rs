//! Error taxonomy for the ingestion pipeline.
//!
//! Per-item failures ([`FetchError`], [`ExtractionMiss`]) are recoverable and
//! are handled at the corpus builder boundary by skipping the item. A
//! [`ListingFetchError`] aborts the build. [`EmptyCorpusVisualization`] is
//! recoverable by substituting a placeholder artifact.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Transport or status failure for a single URL.
#[derive(Debug, Error)]
#[error("failed to fetch {url}: {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            url: url.into(),
            cause: cause.to_string(),
        }
    }
}

/// No configured content selector matched an article page.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no content region matched any of {tried} selectors")]
pub struct ExtractionMiss {
    pub tried: usize,
}

/// The listing page itself could not be retrieved; fatal to the build.
#[derive(Debug, Error)]
#[error("listing page unavailable: {0}")]
pub struct ListingFetchError(#[from] pub FetchError);

/// Visualization was requested for a corpus without any text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("corpus has no content to visualize")]
pub struct EmptyCorpusVisualization;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid base url {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid content selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionMiss),

    #[error(transparent)]
    Listing(#[from] ListingFetchError),

    #[error(transparent)]
    EmptyVisualization(#[from] EmptyCorpusVisualization),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl Error {
    /// Whether the pipeline can carry on by skipping the offending item.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Fetch(_) | Error::Extraction(_) | Error::EmptyVisualization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_carries_url_and_cause() {
        let e = FetchError::new("https://example.com/a", "HTTP 500 Internal Server Error");
        let msg = e.to_string();
        assert!(msg.contains("https://example.com/a"));
        assert!(msg.contains("HTTP 500"));
    }

    #[test]
    fn test_only_listing_and_config_errors_are_fatal() {
        let fetch: Error = FetchError::new("u", "boom").into();
        let miss: Error = ExtractionMiss { tried: 3 }.into();
        let empty: Error = EmptyCorpusVisualization.into();
        let listing: Error = ListingFetchError(FetchError::new("u", "boom")).into();
        let config: Error = ConfigError::Invalid("max_posts".into()).into();

        assert!(fetch.is_recoverable());
        assert!(miss.is_recoverable());
        assert!(empty.is_recoverable());
        assert!(!listing.is_recoverable());
        assert!(!config.is_recoverable());
    }
}
