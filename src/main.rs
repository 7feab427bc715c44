//! Lead-Harvester main entry point
//!
//! This is the command-line interface for the Lead-Harvester pipeline.

use clap::Parser;
use lead_harvester::config::{load_config_with_hash, load_targets, resolve_api_key, Config};
use lead_harvester::output::{export_csv, load_statistics, print_statistics};
use lead_harvester::pipeline::run_harvest;
use lead_harvester::quota::QuotaTracker;
use lead_harvester::storage::open_ledger;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Lead-Harvester: quota-bounded business lead acquisition
///
/// Searches a places provider for every keyword/city target, skips places
/// already in the ledger, probes new business websites for contact emails
/// and appends the results to the ledger.
#[derive(Parser, Debug)]
#[command(name = "lead-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Quota-bounded business lead acquisition", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Places API key (overrides provider.api-key)
    #[arg(long, env = "PLACES_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and targets, show what would be searched, make no requests
    #[arg(long, conflicts_with_all = ["stats", "export_csv"])]
    dry_run: bool,

    /// Show ledger and quota statistics and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_csv"])]
    stats: bool,

    /// Export the ledger to a CSV file and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(path) = &cli.export_csv {
        handle_export_csv(&config, path)?;
    } else {
        handle_run(config, &config_hash, cli.api_key.as_deref()).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lead_harvester=info,warn"),
            1 => EnvFilter::new("lead_harvester=debug,info"),
            2 => EnvFilter::new("lead_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and targets without any request
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Lead-Harvester Dry Run ===\n");

    println!("Provider:");
    println!("  Base URL: {}", config.provider.base_url);
    println!("  Max pages per query: {}", config.provider.max_pages);
    println!(
        "  Language: {}",
        config.provider.language_code.as_deref().unwrap_or("(provider default)")
    );

    let quota = QuotaTracker::open(&config.quota.stats_path, config.quota.monthly_ceiling);
    println!("\nQuota ({}):", quota.path().display());
    println!(
        "  {} / {} requests used in {}",
        quota.state().total_requests,
        quota.ceiling(),
        quota.state().month
    );

    println!("\nProber:");
    println!("  Homepage timeout: {}s", config.prober.homepage_timeout_secs);
    println!("  Secondary timeout: {}s", config.prober.secondary_timeout_secs);
    println!("  Max concurrent probes: {}", config.prober.max_concurrent_probes);

    println!("\nLedger: {}", config.ledger.database_path);

    let targets = load_targets(Path::new(&config.input.targets_path))?;
    println!("\nTargets ({}):", targets.len());
    for target in &targets {
        println!("  - {}", target.query());
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would issue at most {} search request(s)",
        targets.len() * config.provider.max_pages as usize
    );

    Ok(())
}

/// Handles the --stats mode: shows ledger and quota statistics
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Ledger: {}\n", config.ledger.database_path);

    let ledger = open_ledger(Path::new(&config.ledger.database_path))?;
    let quota = QuotaTracker::open(&config.quota.stats_path, config.quota.monthly_ceiling);

    let stats = load_statistics(&ledger, &quota)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-csv mode
fn handle_export_csv(config: &Config, path: &Path) -> anyhow::Result<()> {
    let ledger = open_ledger(Path::new(&config.ledger.database_path))?;
    let rows = export_csv(&ledger, path)?;
    println!("✓ Exported {} contact(s) to: {}", rows, path.display());
    Ok(())
}

/// Handles the main pipeline run
async fn handle_run(config: Config, config_hash: &str, cli_api_key: Option<&str>) -> anyhow::Result<()> {
    // Configuration problems are fatal before anything is searched
    let api_key = resolve_api_key(&config.provider, cli_api_key)?;

    let summary = run_harvest(&config, config_hash, &api_key).await?;
    println!("✓ {}", summary);

    Ok(())
}
