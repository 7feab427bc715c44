//! Configuration module for Lead-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and loading the keyword/city targets the pipeline searches for.
//!
//! # Example
//!
//! ```no_run
//! use lead_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Targets are read from: {}", config.input.targets_path);
//! ```

mod parser;
mod targets;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, InputConfig, LedgerConfig, ProberConfig, ProviderConfig, QuotaConfig, Target,
    DEFAULT_MONTHLY_CEILING, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use targets::load_targets;
pub use validation::resolve_api_key;
