//! Output module for ledger reports and exports
//!
//! This module handles:
//! - Exporting the ledger as CSV with the fixed contact header
//! - Loading and printing ledger and quota statistics

mod csv_export;
pub mod stats;

pub use csv_export::{export_csv, write_csv};
pub use stats::{load_statistics, print_statistics, LedgerStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
