//! Sync cycle orchestration.
//!
//! Each enabled source is fetched in its own task with a bounded timeout;
//! a failure, panic, or hang in one source is recorded in that source's
//! result and never touches the others. A cycle is single-flight: a second
//! run while one is in progress is rejected, not queued.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use guidepost_core::types::BusyInterval;
use guidepost_db::model::source::CalendarSource;

use crate::error::{ServiceError, ServiceResult};
use crate::feed::import::ImportError;
use crate::sync::merge::{self, Conflict, OccupiedRange};

/// Imports busy intervals for one calendar source.
pub trait SourceImporter: Send + Sync {
    fn import<'a>(
        &'a self,
        source: &'a CalendarSource,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<BusyInterval>, ImportError>> + Send + 'a>>;
}

/// Per-source outcome of one cycle: either a count or an error, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceOutcome {
    Imported { count: usize },
    Failed { error: String },
}

/// One source's result within a sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub source_id: Uuid,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SyncResult {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Imported { .. })
    }
}

/// Aggregate outcome of one sync cycle.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub ran_at: DateTime<Utc>,
    /// One entry per enabled source, in registration order.
    pub results: Vec<SyncResult>,
    pub occupied: Vec<OccupiedRange>,
    pub conflicts: Vec<Conflict>,
    pub ledger_overlaps: Vec<Conflict>,
}

/// Drives sync cycles across all registered sources.
pub struct SyncEngine {
    importer: Arc<dyn SourceImporter>,
    fetch_timeout: std::time::Duration,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the cycle ends, on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    #[must_use]
    pub fn new(importer: Arc<dyn SourceImporter>, fetch_timeout: std::time::Duration) -> Self {
        Self {
            importer,
            fetch_timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    /// ## Summary
    /// Runs one sync cycle: fetch every enabled source concurrently and
    /// in isolation, then merge the aggregate against the ledger ranges
    /// exactly once.
    ///
    /// Results are collected in source order, so a cycle over unchanged
    /// inputs reproduces the same report.
    ///
    /// ## Errors
    /// Returns `SyncInProgress` if another cycle holds the in-flight flag.
    /// Individual source failures are data (`SourceOutcome::Failed`), not
    /// errors.
    #[tracing::instrument(skip(self, sources, ledger), fields(source_count = sources.len()))]
    pub async fn run_cycle(
        &self,
        sources: &[CalendarSource],
        ledger: &[OccupiedRange],
        at: DateTime<Utc>,
    ) -> ServiceResult<SyncReport> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Rejecting sync request, a cycle is already running");
            return Err(ServiceError::SyncInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let mut handles = Vec::new();
        for source in sources.iter().filter(|s| s.enabled) {
            let importer = Arc::clone(&self.importer);
            let fetch_timeout = self.fetch_timeout;
            let source = source.clone();
            let source_id = source.id;

            let handle = tokio::spawn(async move {
                tokio::time::timeout(fetch_timeout, importer.import(&source)).await
            });
            handles.push((source_id, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        let mut busy: Vec<BusyInterval> = Vec::new();

        for (source_id, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(Ok(intervals))) => {
                    tracing::debug!(source_id = %source_id, count = intervals.len(), "Source imported");
                    let count = intervals.len();
                    busy.extend(intervals);
                    SourceOutcome::Imported { count }
                }
                Ok(Ok(Err(error))) => {
                    tracing::warn!(source_id = %source_id, error = %error, "Source import failed");
                    SourceOutcome::Failed {
                        error: error.to_string(),
                    }
                }
                Ok(Err(_elapsed)) => {
                    tracing::warn!(source_id = %source_id, timeout_secs = self.fetch_timeout.as_secs(), "Source import timed out");
                    SourceOutcome::Failed {
                        error: format!("timed out after {}s", self.fetch_timeout.as_secs()),
                    }
                }
                Err(join_error) => {
                    tracing::error!(source_id = %source_id, error = %join_error, "Source import task failed");
                    SourceOutcome::Failed {
                        error: format!("import task failed: {join_error}"),
                    }
                }
            };
            results.push(SyncResult { source_id, outcome });
        }

        let merged = merge::merge(ledger, &busy, at);

        Ok(SyncReport {
            ran_at: at,
            results,
            occupied: merged.occupied,
            conflicts: merged.conflicts,
            ledger_overlaps: merged.ledger_overlaps,
        })
    }
}
