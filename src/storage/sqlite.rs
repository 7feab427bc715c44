//! SQLite ledger implementation
//!
//! This module provides a SQLite-based implementation of the Ledger trait,
//! plus the run history shown by `--stats`.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Ledger, StorageError, StorageResult};
use crate::storage::{ContactRecord, RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// SQLite ledger backend
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Opens or creates the ledger database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===== Run Management =====

    /// Records the start of a pipeline run and returns its ID
    pub fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Marks a run as finished
    pub fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        rows_written: u64,
        quota_exhausted: bool,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, rows_written = ?3, quota_exhausted = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                rows_written as i64,
                quota_exhausted,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    /// Gets the most recent runs, newest first
    pub fn get_recent_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status, rows_written, quota_exhausted
             FROM runs ORDER BY id DESC LIMIT ?1",
        )?;

        let runs = stmt
            .query_map(params![limit as i64], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                        .unwrap_or(RunStatus::Failed),
                    rows_written: row.get::<_, i64>(5)? as u64,
                    quota_exhausted: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }

    // ===== Statistics =====

    /// Counts rows whose email column holds at least one address
    pub fn count_rows_with_email(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE email LIKE '%@%'",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Row counts per industry keyword
    pub fn rows_by_industry(&self) -> StorageResult<BTreeMap<String, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT industry, COUNT(*) FROM contacts GROUP BY industry")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(rows)
    }
}

impl Ledger for SqliteLedger {
    fn read_all(&self) -> StorageResult<Vec<ContactRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, email, phone, website, address, industry, place_id
             FROM contacts ORDER BY row_id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ContactRecord {
                    name: row.get(0)?,
                    email: row.get(1)?,
                    phone: row.get(2)?,
                    website: row.get(3)?,
                    address: row.get(4)?,
                    industry: row.get(5)?,
                    place_id: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn append_rows(&mut self, rows: &[ContactRecord]) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO contacts (place_id, name, email, phone, website, address, industry, added_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for row in rows {
                let result = stmt.execute(params![
                    row.place_id,
                    row.name,
                    row.email,
                    row.phone,
                    row.website,
                    row.address,
                    row.industry,
                    now
                ]);

                match result {
                    Ok(_) => {}
                    Err(rusqlite::Error::SqliteFailure(e, _))
                        if e.code == ErrorCode::ConstraintViolation =>
                    {
                        // Dropping the transaction rolls back the rows inserted so far
                        return Err(StorageError::DuplicatePlace(row.place_id.clone()));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn known_place_ids(&self) -> StorageResult<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT place_id FROM contacts")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(ids)
    }

    fn count_rows(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
