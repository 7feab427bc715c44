//! Selection of contact-like links for the secondary scan
//!
//! When a homepage carries no address, the prober follows a few internal links
//! that usually lead to contact or legal pages. Keywords are mixed Polish and
//! English because the target market publishes sites in both languages.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Keywords matched against a link's href and visible text (lower-cased)
pub const CONTACT_KEYWORDS: [&str; 6] = [
    "kontakt",
    "contact",
    "o-nas",
    "about",
    "regulamin",
    "polityka",
];

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("Failed to parse anchor selector"));

/// Finds up to `limit` same-site links that look like contact pages
///
/// # Arguments
///
/// * `html` - The homepage HTML
/// * `page_url` - URL the HTML was served from, used to resolve relative hrefs
/// * `site_url` - The business website as reported by the provider; links must
///   stay on this site even when the homepage redirected elsewhere
/// * `limit` - Maximum number of links to return
///
/// # Returns
///
/// Absolute URLs in document order, without duplicates.
pub fn find_contact_links(html: &str, page_url: &Url, site_url: &Url, limit: usize) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links: Vec<Url> = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        if links.len() >= limit {
            break;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let text = element.text().collect::<String>().to_lowercase();
        let href_lower = href.to_lowercase();
        let is_contact_like = CONTACT_KEYWORDS
            .iter()
            .any(|kw| href_lower.contains(kw) || text.contains(kw));
        if !is_contact_like {
            continue;
        }

        let Some(absolute) = resolve_link(href, page_url) else {
            continue;
        };

        if !is_same_site(&absolute, site_url) {
            tracing::trace!("Skipping external contact link {}", absolute);
            continue;
        }

        if !links.contains(&absolute) {
            links.push(absolute);
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    // `/kontakt#form` and `/kontakt` are the same page
    absolute.set_fragment(None);
    Some(absolute)
}

/// Returns true if both URLs point at the same website
///
/// Hosts are compared case-insensitively with a leading `www.` ignored, and
/// http/https are treated alike. Explicit non-default ports must match.
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    let (Some(host_a), Some(host_b)) = (a.host_str(), b.host_str()) else {
        return false;
    };

    let web_scheme = |u: &Url| u.scheme() == "http" || u.scheme() == "https";
    if !web_scheme(a) || !web_scheme(b) {
        return false;
    }

    // `Url::port` is None when the port is the scheme default
    site_host(host_a) == site_host(host_b) && a.port() == b.port()
}

fn site_host(host: &str) -> String {
    let host = host.to_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        find_contact_links(html, &site(), &site(), 3)
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_matches_href_keyword() {
        let html = r#"<a href="/kontakt">Napisz</a><a href="/oferta">Oferta</a>"#;
        assert_eq!(links(html), vec!["https://example.com/kontakt"]);
    }

    #[test]
    fn test_matches_visible_text_keyword() {
        let html = r#"<a href="/page-7">Contact Us</a>"#;
        assert_eq!(links(html), vec!["https://example.com/page-7"]);
    }

    #[test]
    fn test_all_keywords_are_recognised() {
        let html = r#"
            <a href="/o-nas">x</a>
            <a href="/about">x</a>
            <a href="/regulamin">x</a>
            <a href="/polityka-prywatnosci">x</a>
        "#;
        let found = find_contact_links(html, &site(), &site(), 10);
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn test_excludes_external_links() {
        let html = r#"<a href="https://facebook.com/contact">Contact</a>"#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_excludes_mailto_and_javascript() {
        let html = r##"
            <a href="mailto:contact@example.com">Contact</a>
            <a href="javascript:openContact()">Contact</a>
            <a href="#contact">Contact</a>
        "##;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_deduplicates_and_caps() {
        let html = r#"
            <a href="/kontakt">Kontakt</a>
            <a href="/kontakt#mapa">Kontakt</a>
            <a href="/about">About</a>
            <a href="/regulamin">Regulamin</a>
            <a href="/polityka">Polityka</a>
        "#;
        assert_eq!(
            links(html),
            vec![
                "https://example.com/kontakt",
                "https://example.com/about",
                "https://example.com/regulamin",
            ]
        );
    }

    #[test]
    fn test_same_site_ignores_www_and_scheme() {
        let a = Url::parse("http://www.Example.com/kontakt").unwrap();
        let b = Url::parse("https://example.com/").unwrap();
        assert!(is_same_site(&a, &b));
    }

    #[test]
    fn test_same_site_rejects_other_hosts_and_ports() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert!(!is_same_site(&Url::parse("http://127.0.0.1:9090/").unwrap(), &base));
        assert!(!is_same_site(&Url::parse("http://example.com.evil.io/").unwrap(), &site()));
        assert!(is_same_site(&Url::parse("http://127.0.0.1:8080/contact").unwrap(), &base));
    }

    #[test]
    fn test_links_resolved_against_redirected_page() {
        let site_url = Url::parse("http://example.com/").unwrap();
        let page_url = Url::parse("https://www.example.com/pl/").unwrap();
        let found = find_contact_links(r#"<a href="kontakt">K</a>"#, &page_url, &site_url, 3);
        assert_eq!(found[0].as_str(), "https://www.example.com/pl/kontakt");
    }

    #[test]
    fn test_links_on_redirect_to_other_host_are_rejected() {
        let site_url = Url::parse("http://example.com/").unwrap();
        let page_url = Url::parse("https://parked-domains.net/landing").unwrap();
        let html = r#"<a href="/kontakt">Kontakt</a><a href="https://example.com/contact">Contact</a>"#;
        let found = find_contact_links(html, &page_url, &site_url, 3);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_str(), "https://example.com/contact");
    }
}
