//! Depot wiring for the long-lived engine state: the sync engine and the
//! change-event feed, both constructed once in `main`.

use std::sync::Arc;

use salvo::async_trait;

use guidepost_core::error::CoreError;
use guidepost_service::events::ChangeFeed;
use guidepost_service::sync::orchestrator::SyncEngine;

use crate::error::AppResult;

pub struct SyncEngineHandler {
    pub engine: Arc<SyncEngine>,
}

#[async_trait]
impl salvo::Handler for SyncEngineHandler {
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.engine));
    }
}

pub struct ChangeFeedHandler {
    pub feed: Arc<ChangeFeed>,
}

#[async_trait]
impl salvo::Handler for ChangeFeedHandler {
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.feed));
    }
}

/// ## Summary
/// Retrieves the sync engine from the depot.
///
/// ## Errors
/// Returns an error if the engine is not found in the depot.
pub fn get_engine_from_depot(depot: &salvo::Depot) -> AppResult<Arc<SyncEngine>> {
    depot
        .obtain::<Arc<SyncEngine>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Sync engine not found in depot").into())
}

/// ## Summary
/// Retrieves the change-event feed from the depot.
///
/// ## Errors
/// Returns an error if the feed is not found in the depot.
pub fn get_events_from_depot(depot: &salvo::Depot) -> AppResult<Arc<ChangeFeed>> {
    depot
        .obtain::<Arc<ChangeFeed>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Change feed not found in depot").into())
}
