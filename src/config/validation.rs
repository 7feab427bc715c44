use crate::config::types::{
    Config, InputConfig, LedgerConfig, ProberConfig, ProviderConfig, QuotaConfig,
};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_provider_config(&config.provider)?;
    validate_quota_config(&config.quota)?;
    validate_prober_config(&config.prober)?;
    validate_ledger_config(&config.ledger)?;
    validate_input_config(&config.input)?;
    Ok(())
}

/// Validates the places provider configuration
///
/// The API key is not checked here: it may still be supplied on the command line.
fn validate_provider_config(config: &ProviderConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.max_pages < 1 || config.max_pages > 3 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and 3, got {}",
            config.max_pages
        )));
    }

    if let Some(code) = &config.language_code {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "language-code must be a language tag such as 'pl' or 'en-US', got '{}'",
                code
            )));
        }
    }

    Ok(())
}

/// Validates quota configuration
fn validate_quota_config(config: &QuotaConfig) -> ConfigResult<()> {
    if config.stats_path.is_empty() {
        return Err(ConfigError::Validation(
            "stats-path cannot be empty".to_string(),
        ));
    }

    if config.monthly_ceiling < 1 {
        return Err(ConfigError::Validation(format!(
            "monthly-ceiling must be >= 1, got {}",
            config.monthly_ceiling
        )));
    }

    Ok(())
}

/// Validates prober configuration
fn validate_prober_config(config: &ProberConfig) -> ConfigResult<()> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.homepage_timeout_secs < 1 || config.secondary_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got homepage={}s secondary={}s",
            config.homepage_timeout_secs, config.secondary_timeout_secs
        )));
    }

    if config.max_secondary_links < 1 || config.max_secondary_links > 3 {
        return Err(ConfigError::Validation(format!(
            "max-secondary-links must be between 1 and 3, got {}",
            config.max_secondary_links
        )));
    }

    if config.max_concurrent_probes < 1 || config.max_concurrent_probes > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-probes must be between 1 and 100, got {}",
            config.max_concurrent_probes
        )));
    }

    Ok(())
}

/// Validates ledger configuration
fn validate_ledger_config(config: &LedgerConfig) -> ConfigResult<()> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates input configuration
fn validate_input_config(config: &InputConfig) -> ConfigResult<()> {
    if config.targets_path.is_empty() {
        return Err(ConfigError::Validation(
            "targets-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Picks the API key to use, preferring an explicit override
///
/// Missing credentials are fatal: no search can run without them.
pub fn resolve_api_key(config: &ProviderConfig, cli_key: Option<&str>) -> ConfigResult<String> {
    let key = cli_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| config.api_key.trim());

    if key.is_empty() {
        return Err(ConfigError::MissingCredentials(
            "no places API key in config (provider.api-key) or PLACES_API_KEY".to_string(),
        ));
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ProviderConfig {
        ProviderConfig {
            api_key: "key".to_string(),
            base_url: "https://places.googleapis.com".to_string(),
            language_code: None,
            max_pages: 3,
            page_token_delay_ms: 2000,
        }
    }

    #[test]
    fn test_validate_provider() {
        assert!(validate_provider_config(&provider()).is_ok());

        let mut bad = provider();
        bad.max_pages = 4;
        assert!(validate_provider_config(&bad).is_err());

        let mut bad = provider();
        bad.base_url = "ftp://example.com".to_string();
        assert!(validate_provider_config(&bad).is_err());

        let mut bad = provider();
        bad.language_code = Some("p l".to_string());
        assert!(validate_provider_config(&bad).is_err());
    }

    #[test]
    fn test_validate_prober() {
        assert!(validate_prober_config(&ProberConfig::default()).is_ok());

        let mut bad = ProberConfig::default();
        bad.max_secondary_links = 0;
        assert!(validate_prober_config(&bad).is_err());

        let mut bad = ProberConfig::default();
        bad.max_concurrent_probes = 101;
        assert!(validate_prober_config(&bad).is_err());
    }

    #[test]
    fn test_resolve_api_key() {
        let config = provider();
        assert_eq!(resolve_api_key(&config, None).unwrap(), "key");
        assert_eq!(resolve_api_key(&config, Some("cli")).unwrap(), "cli");
        assert_eq!(resolve_api_key(&config, Some("  ")).unwrap(), "key");

        let mut empty = provider();
        empty.api_key = String::new();
        assert!(matches!(
            resolve_api_key(&empty, None),
            Err(ConfigError::MissingCredentials(_))
        ));
    }
}
