//! Places provider interface and result types

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a places provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    Decode(String),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Minimal description of a place returned by a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceSummary {
    /// Stable provider identifier, used as the ledger's dedup key
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl PlaceSummary {
    /// Website URL, if the place has a non-blank one
    pub fn website(&self) -> Option<&str> {
        self.website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub places: Vec<PlaceSummary>,

    /// Opaque continuation token, passed back verbatim to fetch the next page
    pub next_page_token: Option<String>,
}

/// A paginated places search API
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Runs a text search, continuing from `page_token` when given
    async fn search(&self, query: &str, page_token: Option<&str>) -> ProviderResult<SearchPage>;
}
