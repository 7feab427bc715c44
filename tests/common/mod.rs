//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use lead_harvester::config::ProberConfig;
use lead_harvester::search::{PlaceSummary, PlacesProvider, ProviderError, ProviderResult, SearchPage};
use lead_harvester::{QuotaTracker, SiteProber};
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::TempDir;

/// A search call as seen by the scripted provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub query: String,
    pub page_token: Option<String>,
}

/// Provider serving canned pages per query
///
/// Page N of a query is served for token `page-N`; every page except the
/// last carries the token of the next one.
#[derive(Default)]
pub struct ScriptedProvider {
    pages: HashMap<String, Vec<Vec<PlaceSummary>>>,
    failing: Vec<String>,
    pub calls: Mutex<Vec<SearchCall>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, query: &str, pages: Vec<Vec<PlaceSummary>>) -> Self {
        self.pages.insert(query.to_string(), pages);
        self
    }

    pub fn failing_for(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlacesProvider for ScriptedProvider {
    async fn search(&self, query: &str, page_token: Option<&str>) -> ProviderResult<SearchPage> {
        self.calls.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            page_token: page_token.map(str::to_string),
        });

        if self.failing.iter().any(|q| q == query) {
            return Err(ProviderError::Status {
                status: 500,
                message: "internal error".to_string(),
            });
        }

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ProviderError::Decode(format!("bad token {}", token)))?,
        };

        let pages = self.pages.get(query).cloned().unwrap_or_default();
        let places = pages.get(index).cloned().unwrap_or_default();
        let next_page_token = if index + 1 < pages.len() {
            Some(format!("page-{}", index + 1))
        } else {
            None
        };

        Ok(SearchPage {
            places,
            next_page_token,
        })
    }
}

pub fn place(id: &str, website: Option<&str>) -> PlaceSummary {
    PlaceSummary {
        place_id: id.to_string(),
        name: format!("Firm {}", id),
        address: format!("{} Main St", id),
        phone: Some("555-0100".to_string()),
        website: website.map(str::to_string),
    }
}

pub fn quota(dir: &TempDir, ceiling: u32) -> QuotaTracker {
    QuotaTracker::open(dir.path().join("usage_stats.json"), ceiling)
}

pub fn prober_config() -> ProberConfig {
    ProberConfig {
        homepage_timeout_secs: 5,
        secondary_timeout_secs: 5,
        ..ProberConfig::default()
    }
}

pub fn prober() -> SiteProber {
    SiteProber::new(&prober_config()).expect("Failed to build prober")
}
