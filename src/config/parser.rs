use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses and validates configuration text
///
/// The API key may be absent here; it is resolved later, once a command-line
/// override has had its chance.
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use lead_harvester::config::load_config;
///
/// let config = load_config(Path::new("harvester.toml")).unwrap();
/// println!("Ledger: {}", config.ledger.database_path);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Hex-encoded SHA-256 of the configuration file
///
/// Stored with every run so the ledger history shows which settings produced its rows.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    Ok(hash_content(&std::fs::read_to_string(path)?))
}

/// Loads a configuration and hashes the exact text that was parsed
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[provider]
api-key = "secret"
language-code = "pl"
max-pages = 2
page-token-delay-ms = 0

[quota]
stats-path = "./usage.json"
monthly-ceiling = 100

[prober]
max-concurrent-probes = 5

[ledger]
database-path = "./leads.db"

[input]
targets-path = "./targets.csv"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.provider.api_key, "secret");
        assert_eq!(config.provider.base_url, "https://places.googleapis.com");
        assert_eq!(config.provider.max_pages, 2);
        assert_eq!(config.quota.monthly_ceiling, 100);
        assert_eq!(config.prober.max_concurrent_probes, 5);
        assert_eq!(config.prober.homepage_timeout_secs, 10);
        assert_eq!(config.input.targets_path, "./targets.csv");
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config_content = r#"
[provider]
api-key = "secret"

[ledger]
database-path = "./leads.db"

[input]
targets-path = "./targets.csv"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.provider.max_pages, 3);
        assert_eq!(config.provider.page_token_delay_ms, 2000);
        assert_eq!(config.quota.stats_path, "usage_stats.json");
        assert_eq!(config.quota.monthly_ceiling, 4950);
        assert_eq!(config.prober.max_secondary_links, 3);
    }

    #[test]
    fn test_parse_config_without_api_key() {
        let config = parse_config(
            r#"
[provider]

[ledger]
database-path = "leads.db"

[input]
targets-path = "targets.csv"
"#,
        )
        .unwrap();
        assert!(config.provider.api_key.is_empty());
        assert!(config.provider.language_code.is_none());
    }

    #[test]
    fn test_load_with_hash_matches_file_hash() {
        let file = create_temp_config(
            "[provider]\n[ledger]\ndatabase-path = \"a.db\"\n[input]\ntargets-path = \"t.csv\"\n",
        );
        let (_, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[provider]
api-key = "secret"
max-pages = 5

[ledger]
database-path = "./leads.db"

[input]
targets-path = "./targets.csv"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_config_hash() {
        assert_eq!(
            hash_content("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(hash_content("max-pages = 2"), hash_content("max-pages = 3"));
    }
}
