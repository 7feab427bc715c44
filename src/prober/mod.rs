//! Website prober for contact email discovery
//!
//! This module contains the best-effort email harvesting done for every new
//! place that has a website:
//! - Email extraction from page text
//! - HTTP fetching with bounded timeouts
//! - Selection of contact-like internal links
//! - The two-tier probe that ties them together

mod email;
mod fetcher;
mod links;
mod site;

pub use email::extract_emails;
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use links::{find_contact_links, is_same_site, CONTACT_KEYWORDS};
pub use site::{
    ProbeOutcome, SiteProber, FETCH_FAILED_LABEL, NOT_FOUND_LABEL, NO_WEBSITE_LABEL,
};
