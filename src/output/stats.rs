//! Statistics from the ledger and the quota file
//!
//! This module provides functionality for extracting and displaying
//! ledger statistics for `--stats`.

use crate::output::OutputResult;
use crate::quota::{current_period, QuotaState, QuotaTracker};
use crate::storage::{Ledger, RunRecord, SqliteLedger};
use std::collections::BTreeMap;

/// Ledger statistics summary
#[derive(Debug, Clone)]
pub struct LedgerStatistics {
    /// Total number of contact rows
    pub total_rows: u64,

    /// Rows with at least one email address
    pub rows_with_email: u64,

    /// Row count per industry keyword
    pub rows_by_industry: BTreeMap<String, u64>,

    /// Most recent runs, newest first
    pub recent_runs: Vec<RunRecord>,

    /// Quota usage for the current month
    pub quota: QuotaState,

    /// Configured monthly ceiling
    pub quota_ceiling: u32,
}

impl LedgerStatistics {
    /// Share of rows with an email address, in percent
    pub fn email_rate(&self) -> f64 {
        if self.total_rows > 0 {
            (self.rows_with_email as f64 / self.total_rows as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Loads statistics from the ledger and quota tracker
///
/// A quota file left over from an earlier month is reported as zero usage.
pub fn load_statistics(ledger: &SqliteLedger, quota: &QuotaTracker) -> OutputResult<LedgerStatistics> {
    let period = current_period();
    let quota_state = if quota.state().month == period {
        quota.state().clone()
    } else {
        QuotaState::empty(&period)
    };

    Ok(LedgerStatistics {
        total_rows: ledger.count_rows()?,
        rows_with_email: ledger.count_rows_with_email()?,
        rows_by_industry: ledger.rows_by_industry()?,
        recent_runs: ledger.get_recent_runs(5)?,
        quota: quota_state,
        quota_ceiling: quota.ceiling(),
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &LedgerStatistics) {
    println!("=== Ledger Statistics ===\n");

    println!("Overview:");
    println!("  Total contacts: {}", stats.total_rows);
    println!(
        "  With email: {} ({:.1}%)",
        stats.rows_with_email,
        stats.email_rate()
    );
    println!();

    if !stats.rows_by_industry.is_empty() {
        println!("Contacts by Industry:");
        let mut counts: Vec<_> = stats.rows_by_industry.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));
        for (industry, count) in counts {
            println!("  {}: {}", industry, count);
        }
        println!();
    }

    println!("Quota ({}):", stats.quota.month);
    println!(
        "  Requests used: {} / {}",
        stats.quota.total_requests, stats.quota_ceiling
    );
    println!();

    if !stats.recent_runs.is_empty() {
        println!("Recent Runs:");
        for run in &stats.recent_runs {
            println!(
                "  #{} {} [{}] {} row(s){}",
                run.id,
                run.started_at,
                run.status.to_db_string(),
                run.rows_written,
                if run.quota_exhausted { ", quota exhausted" } else { "" }
            );
        }
    }
}
