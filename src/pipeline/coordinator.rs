//! Pipeline coordinator - main acquisition loop
//!
//! For every target the coordinator walks the search pages and, page by page:
//! - Filters out places already in the ledger
//! - Probes the new places' websites concurrently
//! - Assembles contact rows in provider order
//! - Appends them to the ledger and promotes their IDs on success
//!
//! The quota tracker and the dedup set are only touched from this task;
//! concurrency is limited to the website probes of the current page.

use crate::config::{load_targets, Config, Target};
use crate::pipeline::dedup::{KnownPlaces, PageFilter};
use crate::pipeline::summary::RunSummary;
use crate::prober::{ProbeOutcome, SiteProber};
use crate::quota::QuotaTracker;
use crate::search::{
    GooglePlacesClient, PageFetch, PlaceSummary, PlacesProvider, SearchPaginator, DEFAULT_MAX_PAGES,
};
use crate::storage::{open_ledger, ContactRecord, Ledger, RunStatus, StorageResult};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Duration;

/// Tunables for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Hard cap on result pages per target
    pub max_pages: u32,

    /// Wait before requesting a continuation page
    pub page_token_delay: Duration,

    /// Maximum number of websites probed at the same time
    pub max_concurrent_probes: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_token_delay: Duration::from_secs(2),
            max_concurrent_probes: 20,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_pages: config.provider.max_pages,
            page_token_delay: Duration::from_millis(config.provider.page_token_delay_ms),
            max_concurrent_probes: config.prober.max_concurrent_probes,
        }
    }
}

/// How processing of a target ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Pagination finished; the run can move to the next target
    Done,

    /// The quota refused a search; the run must stop searching
    QuotaExhausted,
}

/// Lead acquisition pipeline
pub struct Pipeline<P: PlacesProvider, L: Ledger> {
    provider: P,
    ledger: L,
    quota: QuotaTracker,
    prober: SiteProber,
    known: KnownPlaces,
    settings: PipelineSettings,
}

impl<P: PlacesProvider, L: Ledger> Pipeline<P, L> {
    /// Creates a pipeline, seeding the dedup set from the ledger
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(StorageError)` - The ledger could not be read
    pub fn new(
        provider: P,
        ledger: L,
        quota: QuotaTracker,
        prober: SiteProber,
        settings: PipelineSettings,
    ) -> StorageResult<Self> {
        let known = KnownPlaces::new(ledger.known_place_ids()?);
        tracing::info!("Ledger holds {} known place(s)", known.len());

        Ok(Self {
            provider,
            ledger,
            quota,
            prober,
            known,
            settings,
        })
    }

    /// Runs the pipeline over all targets
    ///
    /// Only quota exhaustion ends a run early; every other failure is local
    /// to a page or a place and is logged.
    pub async fn run(&mut self, targets: &[Target]) -> RunSummary {
        let mut summary = RunSummary::default();

        for target in targets {
            let outcome = self.process_target(target, &mut summary).await;
            if outcome == TargetOutcome::QuotaExhausted {
                tracing::warn!(
                    "Monthly quota exhausted; skipping {} remaining target(s)",
                    targets.len() - summary.targets_processed
                );
                summary.quota_exhausted = true;
                break;
            }
        }

        tracing::info!("Run finished: {}", summary);
        summary
    }

    /// Searches one target page by page and writes its new places
    pub async fn process_target(&mut self, target: &Target, summary: &mut RunSummary) -> TargetOutcome {
        let Self {
            provider,
            ledger,
            quota,
            prober,
            known,
            settings,
        } = self;

        let query = target.query();
        tracing::info!("Searching: {}", query);
        summary.targets_processed += 1;

        let mut paginator = SearchPaginator::new(
            &*provider,
            query.clone(),
            settings.max_pages,
            settings.page_token_delay,
        );

        while let Some(fetch) = paginator.next_page(quota).await {
            let places = match fetch {
                PageFetch::Page(places) => places,
                PageFetch::QuotaExhausted => return TargetOutcome::QuotaExhausted,
            };

            summary.pages_fetched += 1;
            summary.places_seen += places.len();

            let PageFilter {
                fresh,
                duplicates,
                missing_id,
            } = known.filter_new(places);
            summary.duplicates_skipped += duplicates;
            summary.places_without_id += missing_id;
            if fresh.is_empty() {
                tracing::debug!("No new places on page {} of '{}'", paginator.pages_fetched(), query);
                continue;
            }

            let outcomes = probe_all(prober, &fresh, settings.max_concurrent_probes).await;
            summary.probe_failures += outcomes
                .iter()
                .filter(|o| matches!(o, ProbeOutcome::FetchFailed))
                .count();
            let with_email = outcomes.iter().filter(|o| o.is_found()).count();

            let rows = assemble_rows(target, &fresh, &outcomes);
            let staged = known.stage(rows.iter().map(|r| r.place_id.as_str()));

            match ledger.append_rows(&rows) {
                Ok(()) => {
                    for row in &rows {
                        tracing::info!("New lead: {} ({})", row.name, row.email);
                    }
                    summary.rows_written += staged.len();
                    summary.emails_found += with_email;
                    known.commit(staged);
                }
                Err(e) => {
                    let dropped = known.discard(staged);
                    summary.rows_dropped += dropped;
                    tracing::error!(
                        "Failed to append {} row(s) for '{}': {}",
                        dropped,
                        query,
                        e
                    );
                }
            }
        }

        TargetOutcome::Done
    }

    /// The run's dedup set
    pub fn known_places(&self) -> &KnownPlaces {
        &self.known
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    /// Consumes the pipeline, returning the ledger
    pub fn into_ledger(self) -> L {
        self.ledger
    }
}

/// Runs the full pipeline described by `config` against the Places API
///
/// The run is recorded in the ledger's history together with `config_hash`
/// and its outcome.
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run finished, possibly stopped by the quota
/// * `Err(HarvestError)` - Targets, ledger or HTTP client could not be set up
///
/// # Example
///
/// ```no_run
/// use lead_harvester::config::{load_config_with_hash, resolve_api_key};
/// use lead_harvester::pipeline::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("harvester.toml"))?;
/// let api_key = resolve_api_key(&config.provider, None)?;
/// let summary = run_harvest(&config, &hash, &api_key).await?;
/// println!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    config: &Config,
    config_hash: &str,
    api_key: &str,
) -> crate::Result<RunSummary> {
    let targets = load_targets(Path::new(&config.input.targets_path))?;
    if targets.is_empty() {
        tracing::warn!("No targets in {}, nothing to do", config.input.targets_path);
        return Ok(RunSummary::default());
    }
    tracing::info!("Loaded {} target(s)", targets.len());

    let provider = GooglePlacesClient::new(&config.provider, api_key)?;
    let prober = SiteProber::new(&config.prober)?;
    let quota = QuotaTracker::open(&config.quota.stats_path, config.quota.monthly_ceiling);
    tracing::info!(
        "Quota: {} of {} requests used in {}",
        quota.state().total_requests,
        quota.ceiling(),
        quota.state().month
    );

    let db_path = Path::new(&config.ledger.database_path);
    let mut ledger = open_ledger(db_path)?;
    let run_id = ledger.create_run(config_hash)?;

    let settings = PipelineSettings::from(config);
    let mut pipeline = match Pipeline::new(provider, ledger, quota, prober, settings) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("Failed to read ledger {}: {}", db_path.display(), e);
            mark_run_failed(db_path, run_id);
            return Err(e.into());
        }
    };

    let summary = pipeline.run(&targets).await;

    let mut ledger = pipeline.into_ledger();
    ledger.finish_run(
        run_id,
        RunStatus::Completed,
        summary.rows_written as u64,
        summary.quota_exhausted,
    )?;
    tracing::info!("Ledger now holds {} contact(s)", ledger.count_rows()?);

    Ok(summary)
}

/// Records a run as failed; a failure to do so is only logged
fn mark_run_failed(db_path: &Path, run_id: i64) {
    let marked = open_ledger(db_path)
        .and_then(|mut ledger| ledger.finish_run(run_id, RunStatus::Failed, 0, false));
    if let Err(e) = marked {
        tracing::error!("Could not mark run {} as failed: {}", run_id, e);
    }
}

/// Probes every place concurrently, returning outcomes in input order
///
/// Places without a website get [`ProbeOutcome::NoWebsite`] without a request.
async fn probe_all(prober: &SiteProber, places: &[PlaceSummary], max_concurrent: usize) -> Vec<ProbeOutcome> {
    stream::iter(places.iter().map(|place| async move {
        match place.website() {
            Some(url) => prober.probe(url).await,
            None => ProbeOutcome::NoWebsite,
        }
    }))
    .buffered(max_concurrent.max(1))
    .collect()
    .await
}

/// Builds one ledger row per place, tagged with the target keyword
fn assemble_rows(target: &Target, places: &[PlaceSummary], outcomes: &[ProbeOutcome]) -> Vec<ContactRecord> {
    places
        .iter()
        .zip(outcomes)
        .map(|(place, outcome)| ContactRecord {
            name: place.name.clone(),
            email: outcome.email_cell(),
            phone: place.phone.clone().unwrap_or_default(),
            website: place.website().unwrap_or_default().to_string(),
            address: place.address.clone(),
            industry: target.keyword.clone(),
            place_id: place.place_id.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::{NOT_FOUND_LABEL, NO_WEBSITE_LABEL};

    fn place(id: &str, website: Option<&str>) -> PlaceSummary {
        PlaceSummary {
            place_id: id.to_string(),
            name: format!("Firm {}", id),
            address: "Main St 1".to_string(),
            phone: Some("555-0100".to_string()),
            website: website.map(str::to_string),
        }
    }

    #[test]
    fn test_assemble_rows_keeps_order_and_tags_keyword() {
        let target = Target::new("plumber", "Springfield");
        let places = vec![place("P1", Some("http://a.example")), place("P2", None)];
        let outcomes = vec![ProbeOutcome::NotFound, ProbeOutcome::NoWebsite];

        let rows = assemble_rows(&target, &places, &outcomes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].place_id, "P1");
        assert_eq!(rows[0].email, NOT_FOUND_LABEL);
        assert_eq!(rows[0].website, "http://a.example");
        assert_eq!(rows[0].industry, "plumber");
        assert_eq!(rows[1].email, NO_WEBSITE_LABEL);
        assert_eq!(rows[1].website, "");
        assert_eq!(rows[1].phone, "555-0100");
    }

    #[test]
    fn test_mark_run_failed_updates_history() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("ledger.db");
        let run_id = open_ledger(&db_path).unwrap().create_run("hash").unwrap();

        mark_run_failed(&db_path, run_id);

        let runs = open_ledger(&db_path).unwrap().get_recent_runs(1).unwrap();
        assert_eq!(runs[0].status, RunStatus::Failed);
        assert!(runs[0].finished_at.is_some());
    }

    #[test]
    fn test_mark_run_failed_tolerates_unopenable_ledger() {
        // Only logs; the caller keeps reporting its own error
        mark_run_failed(Path::new("/nonexistent/dir/ledger.db"), 1);
    }

    #[tokio::test]
    async fn test_probe_all_without_websites_makes_no_requests() {
        let prober = SiteProber::new(&crate::config::ProberConfig::default()).unwrap();
        let places = vec![place("P1", None), place("P2", Some("  "))];
        let outcomes = probe_all(&prober, &places, 4).await;
        assert_eq!(outcomes, vec![ProbeOutcome::NoWebsite, ProbeOutcome::NoWebsite]);
    }
}
