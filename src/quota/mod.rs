//! Monthly request quota tracking
//!
//! Every call to the places provider is gated by a [`QuotaTracker`], which keeps
//! a per-calendar-month counter in a small JSON file next to the ledger.

mod tracker;

pub use tracker::{current_period, QuotaState, QuotaTracker};
