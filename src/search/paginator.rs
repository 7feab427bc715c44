//! Quota-gated pagination over a places provider

use crate::quota::QuotaTracker;
use crate::search::provider::{PlaceSummary, PlacesProvider, SearchPage};
use std::time::Duration;

/// Default hard cap on pages per query
pub const DEFAULT_MAX_PAGES: u32 = 3;

/// Fetches one page of results behind the quota gate
///
/// # Returns
///
/// * `Some(page)` - The provider's page; a provider error is logged and
///   reported as an empty page without continuation token
/// * `None` - The quota is exhausted and no request was made
pub async fn fetch_page<P: PlacesProvider + ?Sized>(
    provider: &P,
    quota: &mut QuotaTracker,
    query: &str,
    page_token: Option<&str>,
) -> Option<SearchPage> {
    if !quota.allow(1) {
        return None;
    }

    match provider.search(query, page_token).await {
        Ok(page) => Some(page),
        Err(e) => {
            tracing::warn!("Search for '{}' failed: {}", query, e);
            Some(SearchPage::default())
        }
    }
}

/// Result of asking the paginator for another page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetch {
    /// Places from the next page, in provider order
    Page(Vec<PlaceSummary>),

    /// The monthly quota refused the request
    QuotaExhausted,
}

/// Walks the result pages of a single query
///
/// Stops when the provider returns no continuation token, when `max_pages`
/// pages have been fetched (whatever the provider says), or when the quota
/// gate refuses a request.
pub struct SearchPaginator<'a, P: PlacesProvider + ?Sized> {
    provider: &'a P,
    query: String,
    max_pages: u32,
    token_delay: Duration,
    pages_fetched: u32,
    next_token: Option<String>,
    finished: bool,
}

impl<'a, P: PlacesProvider + ?Sized> SearchPaginator<'a, P> {
    /// Creates a paginator for `query`
    ///
    /// `token_delay` is waited before each continuation request; freshly
    /// issued tokens are rejected by some providers for a short while.
    pub fn new(provider: &'a P, query: impl Into<String>, max_pages: u32, token_delay: Duration) -> Self {
        Self {
            provider,
            query: query.into(),
            max_pages,
            token_delay,
            pages_fetched: 0,
            next_token: None,
            finished: false,
        }
    }

    /// Fetches the next page, or returns None once pagination is over
    pub async fn next_page(&mut self, quota: &mut QuotaTracker) -> Option<PageFetch> {
        if self.finished || self.pages_fetched >= self.max_pages {
            return None;
        }

        let token = if self.pages_fetched == 0 {
            None
        } else {
            match self.next_token.take() {
                Some(token) => Some(token),
                None => {
                    self.finished = true;
                    return None;
                }
            }
        };

        if token.is_some() && !self.token_delay.is_zero() {
            tokio::time::sleep(self.token_delay).await;
        }

        let Some(page) = fetch_page(self.provider, quota, &self.query, token.as_deref()).await
        else {
            self.finished = true;
            return Some(PageFetch::QuotaExhausted);
        };

        self.pages_fetched += 1;
        self.next_token = page.next_page_token;
        tracing::debug!(
            "Page {} of '{}' returned {} place(s)",
            self.pages_fetched,
            self.query,
            page.places.len()
        );

        Some(PageFetch::Page(page.places))
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// The query being paginated
    pub fn query(&self) -> &str {
        &self.query
    }
}
