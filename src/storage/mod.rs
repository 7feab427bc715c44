//! Ledger storage for collected contacts
//!
//! This module handles persistence of the contact records the pipeline
//! produces, including:
//! - The append-only [`Ledger`] interface used by the pipeline
//! - A SQLite-backed ledger with run history
//! - An in-memory ledger for tests

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
pub use traits::{Ledger, StorageError, StorageResult};

use serde::Serialize;
use std::path::Path;

/// Column headers of the ledger, in storage order
///
/// The seventh column (`PlaceID`) is the deduplication key across runs.
pub const LEDGER_HEADER: [&str; 7] = [
    "Name", "Email", "Phone", "Website", "Address", "Industry", "PlaceID",
];

/// Opens (or creates) the SQLite ledger at `path`
pub fn open_ledger(path: &Path) -> StorageResult<SqliteLedger> {
    SqliteLedger::new(path)
}

/// One row of the ledger
///
/// Serializes with the [`LEDGER_HEADER`] column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Address")]
    pub address: String,
    /// Keyword of the target that found this place
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "PlaceID")]
    pub place_id: String,
}

/// Represents a pipeline run recorded in the ledger
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub rows_written: u64,
    pub quota_exhausted: bool,
}

/// Status of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
