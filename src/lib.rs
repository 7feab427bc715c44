//! Lead-Harvester: quota-bounded business lead acquisition
//!
//! This crate searches a places provider for businesses matching keyword/city
//! targets, skips places already recorded in the ledger, probes each new
//! business website for contact emails and appends the enriched rows.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod prober;
pub mod quota;
pub mod search;
pub mod storage;

use thiserror::Error;

/// Main error type for Lead-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Targets file {path} could not be read: {message}")]
    Targets { path: String, message: String },
}

/// Result type alias for Lead-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, Target};
pub use pipeline::{run_harvest, Pipeline, RunSummary};
pub use prober::{extract_emails, ProbeOutcome, SiteProber};
pub use quota::{QuotaState, QuotaTracker};
pub use search::{PlaceSummary, PlacesProvider, SearchPage};
pub use storage::{ContactRecord, Ledger};
