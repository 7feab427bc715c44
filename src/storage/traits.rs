//! Ledger trait and error types
//!
//! This module defines the interface every ledger backend implements and
//! the associated error types.

use crate::storage::ContactRecord;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Place {0} is already in the ledger")]
    DuplicatePlace(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only store of contact records
///
/// Rows are never edited or deleted. An append is all-or-nothing: when it
/// fails, none of the batch's rows are stored.
pub trait Ledger {
    /// Returns every row in insertion order
    fn read_all(&self) -> StorageResult<Vec<ContactRecord>>;

    /// Appends a batch of rows
    ///
    /// Fails with [`StorageError::DuplicatePlace`] if any row's `place_id` is
    /// already stored or repeated within the batch.
    fn append_rows(&mut self, rows: &[ContactRecord]) -> StorageResult<()>;

    /// Returns the place IDs of all stored rows
    fn known_place_ids(&self) -> StorageResult<HashSet<String>> {
        Ok(self
            .read_all()?
            .into_iter()
            .map(|row| row.place_id)
            .filter(|id| !id.is_empty())
            .collect())
    }

    /// Counts stored rows
    fn count_rows(&self) -> StorageResult<u64> {
        Ok(self.read_all()?.len() as u64)
    }
}
