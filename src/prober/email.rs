//! Email address extraction from page text

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Permissive address pattern: ASCII local part, dotted domain, alphabetic TLD
const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

/// Asset filenames such as `logo@2x.png` look like addresses in minified markup
const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".svg"];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("Failed to compile email regex"));

/// Extracts lower-cased email addresses from arbitrary text
///
/// Matches ending in an image extension are dropped. The result is sorted,
/// which keeps the rendered email cell stable between runs.
///
/// # Example
///
/// ```
/// use lead_harvester::prober::extract_emails;
///
/// let emails = extract_emails("Write to Biuro@Example.pl or see logo@2x.png");
/// assert_eq!(emails.into_iter().collect::<Vec<_>>(), vec!["biuro@example.pl"]);
/// ```
pub fn extract_emails(text: &str) -> BTreeSet<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|email| !IMAGE_EXTENSIONS.iter().any(|ext| email.ends_with(ext)))
        .collect()
}
