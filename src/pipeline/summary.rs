//! Per-run counters reported at the end of a pipeline run

use std::fmt;

/// What one pipeline run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Targets whose search was started
    pub targets_processed: usize,

    /// Result pages received from the provider
    pub pages_fetched: usize,

    /// Places returned across all pages
    pub places_seen: usize,

    /// Places skipped because they were already known
    pub duplicates_skipped: usize,

    /// Places dropped because the provider gave no ID
    pub places_without_id: usize,

    /// Rows confirmed written to the ledger
    pub rows_written: usize,

    /// Rows lost to failed ledger appends
    pub rows_dropped: usize,

    /// Written rows that carry at least one email address
    pub emails_found: usize,

    /// Websites whose homepage could not be fetched
    pub probe_failures: usize,

    /// Whether the monthly quota stopped the run
    pub quota_exhausted: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} target(s), {} page(s), {} place(s) seen, {} known, {} without ID, {} written ({} with email), {} dropped, {} unreachable site(s)",
            self.targets_processed,
            self.pages_fetched,
            self.places_seen,
            self.duplicates_skipped,
            self.places_without_id,
            self.rows_written,
            self.emails_found,
            self.rows_dropped,
            self.probe_failures
        )?;
        if self.quota_exhausted {
            write!(f, "; stopped by monthly quota")?;
        }
        Ok(())
    }
}
