use std::sync::Arc;

use salvo::{Depot, Response, Router, handler, http::StatusCode, writing::Json};
use tracing::error;

use guidepost_core::config::Settings;
use guidepost_service::error::ServiceError;
use guidepost_service::partner::{self, PartnerClient};
use guidepost_service::sync::orchestrator::SyncReport;
use guidepost_service::sync::run_sync;

use super::ErrorResponse;
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::state::{get_engine_from_depot, get_events_from_depot};

/// ## Summary
/// POST /app/sync - The manual sync trigger.
///
/// Runs one cycle across all registered sources and returns the full
/// report: per-source results, the merged occupied view, conflicts, and
/// ledger overlaps. When the partner push is configured, the merged
/// availability is forwarded in the background after a successful run.
///
/// ## Errors
/// Returns HTTP 409 when a sync is already running
/// Returns HTTP 500 if database operations fail
#[handler]
async fn trigger_sync(depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing manual sync request");

    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    let engine = match get_engine_from_depot(depot) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = ?e, "Failed to get sync engine");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    let events = match get_events_from_depot(depot) {
        Ok(feed) => feed,
        Err(e) => {
            error!(error = ?e, "Failed to get change feed");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    let default_duration =
        chrono::Duration::minutes(i64::from(config.sync.default_event_duration_minutes));

    match run_sync(provider.as_ref(), &engine, default_duration, &events).await {
        Ok(report) => {
            push_availability_in_background(&config, &report);
            res.render(Json(report));
        }
        Err(ServiceError::SyncInProgress) => {
            res.status_code(StatusCode::CONFLICT);
            res.render(Json(ErrorResponse::new(
                "A sync run is already in progress",
            )));
        }
        Err(e) => {
            error!(error = %e, "Sync run failed");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Sync run failed")));
        }
    }
}

/// Forwards the merged availability to the partner without delaying the
/// sync response. The push task reports its own success or failure;
/// retrying is the operator's decision.
fn push_availability_in_background(config: &Arc<Settings>, report: &SyncReport) {
    let Some(product_id) = config.partner.product_id.clone() else {
        tracing::debug!("Partner push skipped, no product configured");
        return;
    };

    let client = match PartnerClient::from_config(&config.partner) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Partner push skipped");
            return;
        }
    };

    let availabilities = partner::occupied_to_availability(&report.occupied);
    tokio::spawn(async move {
        match client.push_availability(&product_id, &availabilities).await {
            Ok(()) => tracing::info!(product_id, "Partner availability push succeeded"),
            Err(e) => tracing::warn!(product_id, error = %e, "Partner availability push failed"),
        }
    });
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("sync").post(trigger_sync)
}
