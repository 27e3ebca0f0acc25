//! The sync core: availability merging and cycle orchestration.

pub mod merge;
pub mod orchestrator;

use chrono::Utc;

use guidepost_db::db::{DbProvider, query};

use crate::error::ServiceResult;
use crate::events::{ChangeEvent, ChangeFeed};
use crate::ledger;
use self::orchestrator::{SyncEngine, SyncReport};

/// ## Summary
/// Runs one full sync: loads the registered sources and the occupying
/// ledger state, executes a cycle, then records `last_synced_at` for every
/// source that succeeded. Sources that failed keep their previous
/// timestamp. Bookings are never mutated here; conflicts are only
/// reported.
///
/// The database connection is released before any network fetch starts
/// and re-acquired afterwards.
///
/// ## Errors
/// Returns `SyncInProgress` when another run holds the cycle, or a
/// database error from loading/recording state.
#[tracing::instrument(skip_all)]
pub async fn run_sync(
    provider: &dyn DbProvider,
    engine: &SyncEngine,
    default_duration: chrono::Duration,
    events: &ChangeFeed,
) -> ServiceResult<SyncReport> {
    let (sources, ledger_ranges) = {
        let mut conn = provider.get_connection().await?;
        let sources = query::source::all(&mut conn).await?;
        let bookings = query::booking::occupying(&mut conn).await?;
        (sources, ledger::to_occupied_ranges(&bookings, default_duration))
    };

    let report = engine
        .run_cycle(&sources, &ledger_ranges, Utc::now())
        .await?;

    let mut conn = provider.get_connection().await?;
    for result in report.results.iter().filter(|r| r.succeeded()) {
        query::source::touch_last_synced(&mut conn, result.source_id, report.ran_at).await?;
    }

    let sources_failed = report.results.iter().filter(|r| !r.succeeded()).count();
    let sources_synced = report.results.len() - sources_failed;

    events.publish(ChangeEvent::SyncCompleted {
        sources_synced,
        sources_failed,
        conflicts: report.conflicts.len(),
    });

    tracing::info!(
        sources_synced,
        sources_failed,
        conflicts = report.conflicts.len(),
        ledger_overlaps = report.ledger_overlaps.len(),
        "Sync run finished"
    );

    Ok(report)
}
