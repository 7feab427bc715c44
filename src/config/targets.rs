//! Loading of keyword/city targets from CSV

use crate::config::types::Target;
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Loads search targets from a CSV file with a `keyword,city` header
///
/// Rows with an empty keyword or city are skipped with a warning. A missing
/// or unreadable file is a configuration error and aborts the run.
pub fn load_targets(path: &Path) -> ConfigResult<Vec<Target>> {
    let targets_error = |message: String| ConfigError::Targets {
        path: path.display().to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| targets_error(e.to_string()))?;

    let mut targets = Vec::new();
    for (index, record) in reader.deserialize::<Target>().enumerate() {
        let target = record.map_err(|e| targets_error(format!("row {}: {}", index + 1, e)))?;

        if target.keyword.is_empty() || target.city.is_empty() {
            tracing::warn!(
                "Skipping incomplete target on row {} of {}",
                index + 1,
                path.display()
            );
            continue;
        }

        targets.push(target);
    }

    Ok(targets)
}
