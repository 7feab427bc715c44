use serde::Deserialize;

/// Browser-like user agent; some sites reject clients that do not identify as a browser
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Stop threshold kept below the provider's hard cap of 5000 monthly requests
pub const DEFAULT_MONTHLY_CEILING: u32 = 4950;

/// Main configuration structure for Lead-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub prober: ProberConfig,
    pub ledger: LedgerConfig,
    pub input: InputConfig,
}

/// Places provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API key for the places provider
    #[serde(rename = "api-key", default)]
    pub api_key: String,

    /// Base URL of the places API
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Optional language code passed to the provider
    #[serde(rename = "language-code", default)]
    pub language_code: Option<String>,

    /// Hard cap on result pages per query
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Delay before requesting a continuation page (milliseconds)
    #[serde(rename = "page-token-delay-ms", default = "default_page_token_delay_ms")]
    pub page_token_delay_ms: u64,
}

/// Monthly request quota configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    /// Path to the JSON file holding the monthly counter
    #[serde(rename = "stats-path", default = "default_stats_path")]
    pub stats_path: String,

    /// Number of requests after which the tracker refuses further calls
    #[serde(rename = "monthly-ceiling", default = "default_monthly_ceiling")]
    pub monthly_ceiling: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            stats_path: default_stats_path(),
            monthly_ceiling: default_monthly_ceiling(),
        }
    }
}

/// Website prober configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProberConfig {
    /// User agent sent with every website request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for the homepage fetch (seconds)
    #[serde(rename = "homepage-timeout-secs", default = "default_homepage_timeout")]
    pub homepage_timeout_secs: u64,

    /// Timeout for each secondary page fetch (seconds)
    #[serde(rename = "secondary-timeout-secs", default = "default_secondary_timeout")]
    pub secondary_timeout_secs: u64,

    /// Maximum number of contact-like pages fetched per site
    #[serde(rename = "max-secondary-links", default = "default_max_secondary_links")]
    pub max_secondary_links: usize,

    /// Maximum number of sites probed at the same time
    #[serde(rename = "max-concurrent-probes", default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            homepage_timeout_secs: default_homepage_timeout(),
            secondary_timeout_secs: default_secondary_timeout(),
            max_secondary_links: default_max_secondary_links(),
            max_concurrent_probes: default_max_concurrent_probes(),
        }
    }
}

/// Ledger configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Path to the SQLite ledger database
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Input configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the CSV file of keyword/city targets
    #[serde(rename = "targets-path")]
    pub targets_path: String,
}

/// A single keyword/city search target
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    pub keyword: String,
    pub city: String,
}

impl Target {
    pub fn new(keyword: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            city: city.into(),
        }
    }

    /// The text query sent to the places provider
    pub fn query(&self) -> String {
        format!("{} {}", self.keyword, self.city)
    }
}

fn default_base_url() -> String {
    "https://places.googleapis.com".to_string()
}

fn default_max_pages() -> u32 {
    3
}

fn default_page_token_delay_ms() -> u64 {
    2000
}

fn default_stats_path() -> String {
    "usage_stats.json".to_string()
}

fn default_monthly_ceiling() -> u32 {
    DEFAULT_MONTHLY_CEILING
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_homepage_timeout() -> u64 {
    10
}

fn default_secondary_timeout() -> u64 {
    7
}

fn default_max_secondary_links() -> usize {
    3
}

fn default_max_concurrent_probes() -> usize {
    20
}
