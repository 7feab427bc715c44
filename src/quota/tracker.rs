use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted quota counter for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    /// Calendar month the counter belongs to, formatted `YYYY-MM`
    pub month: String,

    /// Provider requests made during `month`
    pub total_requests: u32,
}

impl QuotaState {
    /// Creates an empty counter for the given period
    pub fn empty(month: &str) -> Self {
        Self {
            month: month.to_string(),
            total_requests: 0,
        }
    }
}

/// Returns the current calendar period label (`YYYY-MM`, local time)
pub fn current_period() -> String {
    Local::now().format("%Y-%m").to_string()
}

/// Gate for outbound provider requests
///
/// The tracker owns the quota state for the lifetime of a run and writes it
/// back to disk after every successful increment, so a crash loses at most
/// the request that was in flight.
#[derive(Debug)]
pub struct QuotaTracker {
    path: PathBuf,
    ceiling: u32,
    state: QuotaState,
}

impl QuotaTracker {
    /// Opens the tracker backed by the JSON file at `path`
    ///
    /// A missing or unparsable file is treated as an empty counter for the
    /// current period; it is never an error.
    pub fn open(path: impl Into<PathBuf>, ceiling: u32) -> Self {
        let path = path.into();
        let state = load_state(&path, &current_period());
        Self {
            path,
            ceiling,
            state,
        }
    }

    /// Asks permission for `increment` provider requests in the current month
    ///
    /// # Returns
    ///
    /// * `true` - The counter was incremented and persisted
    /// * `false` - The ceiling has been reached; nothing was written
    pub fn allow(&mut self, increment: u32) -> bool {
        let period = current_period();
        self.allow_in_period(increment, &period)
    }

    /// Same as [`allow`](Self::allow) with an explicit period label
    pub fn allow_in_period(&mut self, increment: u32, period: &str) -> bool {
        if self.state.month != period {
            tracing::info!(
                "Quota period changed from {} to {}, resetting counter",
                self.state.month,
                period
            );
            self.state = QuotaState::empty(period);
        }

        if self.state.total_requests >= self.ceiling {
            tracing::warn!(
                "Monthly quota of {} requests reached for {}",
                self.ceiling,
                self.state.month
            );
            return false;
        }

        self.state.total_requests = self.state.total_requests.saturating_add(increment);

        // The in-memory counter stays authoritative for this run even if the write fails.
        if let Err(e) = self.persist() {
            tracing::error!(
                "Failed to persist quota state to {}: {}",
                self.path.display(),
                e
            );
        }

        true
    }

    /// Current quota state
    pub fn state(&self) -> &QuotaState {
        &self.state
    }

    /// Configured request ceiling
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Requests left before the tracker starts refusing
    pub fn remaining(&self) -> u32 {
        self.ceiling.saturating_sub(self.state.total_requests)
    }

    /// Path of the backing JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the state through a temporary file so a torn write never leaves
    /// a half-written counter behind
    fn persist(&self) -> std::io::Result<()> {
        let json = serde_json::to_string(&self.state)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)
    }
}

/// Reads the persisted state, falling back to an empty counter for `period`
fn load_state(path: &Path, period: &str) -> QuotaState {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not read quota file {}: {}", path.display(), e);
            }
            return QuotaState::empty(period);
        }
    };

    match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(
                "Quota file {} is corrupt ({}), starting from zero",
                path.display(),
                e
            );
            QuotaState::empty(period)
        }
    }
}
