//! Two-tier website probe: homepage first, then a few contact-like pages

use crate::config::ProberConfig;
use crate::prober::email::extract_emails;
use crate::prober::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::prober::links::find_contact_links;
use futures::future::join_all;
use reqwest::Client;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Email cell text when the site was reachable but carried no address
pub const NOT_FOUND_LABEL: &str = "no email found";

/// Email cell text when the homepage could not be fetched
pub const FETCH_FAILED_LABEL: &str = "connection failed";

/// Email cell text for places without a website
pub const NO_WEBSITE_LABEL: &str = "no website";

/// Outcome of probing one business website
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// At least one address was found
    Found(BTreeSet<String>),

    /// Pages were fetched but no address appeared on them
    NotFound,

    /// The homepage could not be fetched
    FetchFailed,

    /// The place has no website to probe
    NoWebsite,
}

impl ProbeOutcome {
    /// Returns true if at least one address was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Text stored in the ledger's email column
    pub fn email_cell(&self) -> String {
        match self {
            Self::Found(emails) => emails.iter().cloned().collect::<Vec<_>>().join(", "),
            Self::NotFound => NOT_FOUND_LABEL.to_string(),
            Self::FetchFailed => FETCH_FAILED_LABEL.to_string(),
            Self::NoWebsite => NO_WEBSITE_LABEL.to_string(),
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email_cell())
    }
}

/// Website prober
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SiteProber {
    client: Client,
    homepage_timeout: Duration,
    secondary_timeout: Duration,
    max_secondary_links: usize,
}

impl SiteProber {
    /// Creates a prober from configuration
    pub fn new(config: &ProberConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a prober around an existing HTTP client
    pub fn with_client(client: Client, config: &ProberConfig) -> Self {
        Self {
            client,
            homepage_timeout: Duration::from_secs(config.homepage_timeout_secs),
            secondary_timeout: Duration::from_secs(config.secondary_timeout_secs),
            max_secondary_links: config.max_secondary_links,
        }
    }

    /// Probes a business website for contact emails
    ///
    /// # Algorithm
    ///
    /// 1. Empty URL → `NoWebsite`, no request is made
    /// 2. Fetch the homepage; any failure → `FetchFailed`
    /// 3. Addresses on the homepage → `Found`, stop
    /// 4. Otherwise fetch up to `max_secondary_links` same-site contact-like
    ///    pages concurrently; failures among them are ignored
    /// 5. Union of their addresses → `Found`, or `NotFound`
    pub async fn probe(&self, base_url: &str) -> ProbeOutcome {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return ProbeOutcome::NoWebsite;
        }

        let site_url = match parse_site_url(base_url) {
            Some(url) => url,
            None => {
                tracing::warn!("Unusable website URL '{}'", base_url);
                return ProbeOutcome::FetchFailed;
            }
        };

        let (page_url, body) =
            match fetch_page(&self.client, &site_url, self.homepage_timeout).await {
                FetchResult::Success { final_url, body } => (final_url, body),
                FetchResult::HttpError { status_code } => {
                    tracing::info!("Homepage {} returned HTTP {}", site_url, status_code);
                    return ProbeOutcome::FetchFailed;
                }
                FetchResult::NetworkError { error } => {
                    tracing::info!("Homepage {} unreachable: {}", site_url, error);
                    return ProbeOutcome::FetchFailed;
                }
            };

        let emails = extract_emails(&body);
        if !emails.is_empty() {
            tracing::debug!("Found {} address(es) on {}", emails.len(), site_url);
            return ProbeOutcome::Found(emails);
        }

        let links = find_contact_links(&body, &page_url, &site_url, self.max_secondary_links);
        if links.is_empty() {
            tracing::debug!("No contact-like links on {}", site_url);
            return ProbeOutcome::NotFound;
        }

        tracing::debug!("Scanning {} secondary page(s) of {}", links.len(), site_url);
        let pages = join_all(links.iter().map(|link| self.emails_on(link))).await;
        let emails: BTreeSet<String> = pages.into_iter().flatten().collect();

        if emails.is_empty() {
            ProbeOutcome::NotFound
        } else {
            ProbeOutcome::Found(emails)
        }
    }

    /// Fetches a secondary page; an unreachable page yields no addresses
    async fn emails_on(&self, url: &Url) -> BTreeSet<String> {
        match fetch_page(&self.client, url, self.secondary_timeout).await {
            FetchResult::Success { body, .. } => extract_emails(&body),
            FetchResult::HttpError { status_code } => {
                tracing::debug!("Secondary page {} returned HTTP {}", url, status_code);
                BTreeSet::new()
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Secondary page {} failed: {}", url, error);
                BTreeSet::new()
            }
        }
    }
}

/// Parses a website URL, assuming `http://` when the scheme is missing
fn parse_site_url(raw: &str) -> Option<Url> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("http://{}", raw)).ok()?
        }
        Err(_) => return None,
    };

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_cell_rendering() {
        let found = ProbeOutcome::Found(
            ["b@x.pl".to_string(), "a@x.pl".to_string()]
                .into_iter()
                .collect(),
        );
        assert_eq!(found.email_cell(), "a@x.pl, b@x.pl");
        assert_eq!(ProbeOutcome::NotFound.email_cell(), NOT_FOUND_LABEL);
        assert_eq!(ProbeOutcome::FetchFailed.email_cell(), FETCH_FAILED_LABEL);
        assert_eq!(ProbeOutcome::NoWebsite.to_string(), NO_WEBSITE_LABEL);
    }

    #[test]
    fn test_parse_site_url() {
        assert_eq!(
            parse_site_url("example.com").unwrap().as_str(),
            "http://example.com/"
        );
        assert!(parse_site_url("https://example.com/pl").is_some());
        assert!(parse_site_url("ftp://example.com").is_none());
        assert!(parse_site_url("http://").is_none());
    }

    #[tokio::test]
    async fn test_empty_url_makes_no_request() {
        let prober = SiteProber::new(&ProberConfig::default()).unwrap();
        assert_eq!(prober.probe("").await, ProbeOutcome::NoWebsite);
        assert_eq!(prober.probe("   ").await, ProbeOutcome::NoWebsite);
    }
}
