//! In-memory ledger

use crate::storage::traits::{Ledger, StorageError, StorageResult};
use crate::storage::ContactRecord;
use std::collections::HashSet;

/// Ledger kept in process memory
///
/// Used by tests. Appends can be made to fail on demand to
/// exercise write-failure handling.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    rows: Vec<ContactRecord>,
    fail_appends: bool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger that already holds `rows`
    pub fn with_rows(rows: Vec<ContactRecord>) -> Self {
        Self {
            rows,
            fail_appends: false,
        }
    }

    /// Makes every following append fail (or succeed again)
    pub fn set_fail_appends(&mut self, fail: bool) {
        self.fail_appends = fail;
    }

    pub fn rows(&self) -> &[ContactRecord] {
        &self.rows
    }
}

impl Ledger for MemoryLedger {
    fn read_all(&self) -> StorageResult<Vec<ContactRecord>> {
        Ok(self.rows.clone())
    }

    fn append_rows(&mut self, rows: &[ContactRecord]) -> StorageResult<()> {
        if self.fail_appends {
            return Err(StorageError::Unavailable(
                "appends disabled on memory ledger".to_string(),
            ));
        }

        let mut seen: HashSet<&str> = self.rows.iter().map(|r| r.place_id.as_str()).collect();
        for row in rows {
            if !seen.insert(row.place_id.as_str()) {
                return Err(StorageError::DuplicatePlace(row.place_id.clone()));
            }
        }

        self.rows.extend_from_slice(rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(place_id: &str) -> ContactRecord {
        ContactRecord {
            name: format!("Firm {}", place_id),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            address: String::new(),
            industry: "plumber".to_string(),
            place_id: place_id.to_string(),
        }
    }

    #[test]
    fn test_append_and_read() {
        let mut ledger = MemoryLedger::new();
        ledger.append_rows(&[record("A"), record("B")]).unwrap();
        ledger.append_rows(&[record("C")]).unwrap();

        let ids: Vec<String> = ledger.read_all().unwrap().into_iter().map(|r| r.place_id).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(ledger.count_rows().unwrap(), 3);
    }

    #[test]
    fn test_duplicate_batch_is_rejected_whole() {
        let mut ledger = MemoryLedger::with_rows(vec![record("A")]);
        let result = ledger.append_rows(&[record("B"), record("A")]);

        assert!(matches!(result, Err(StorageError::DuplicatePlace(id)) if id == "A"));
        assert_eq!(ledger.rows().len(), 1);
    }

    #[test]
    fn test_failing_appends() {
        let mut ledger = MemoryLedger::new();
        ledger.set_fail_appends(true);
        assert!(ledger.append_rows(&[record("A")]).is_err());
        assert!(ledger.rows().is_empty());
    }

    #[test]
    fn test_known_place_ids() {
        let ledger = MemoryLedger::with_rows(vec![record("A"), record("B")]);
        let ids = ledger.known_place_ids().unwrap();
        assert!(ids.contains("A") && ids.contains("B"));
        assert_eq!(ids.len(), 2);
    }
}
