use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use guidepost_core::error::CoreError;
use guidepost_db::db::DbProvider;
use guidepost_db::db::connection::DbPool;

/// Injects the ledger pool into the depot as a [`DbProvider`] trait
/// object, keeping handlers decoupled from the concrete pool type.
pub struct DbProviderHandler {
    pub pool: DbPool,
}

#[async_trait]
impl salvo::Handler for DbProviderHandler {
    #[tracing::instrument(skip_all)]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        let provider: Arc<dyn DbProvider + Send + Sync> = Arc::new(self.pool.clone());
        depot.inject(provider);
    }
}

/// ## Summary
/// Retrieves the database provider from the depot.
///
/// ## Errors
/// Returns an error if the database provider is not found in the depot.
pub fn get_db_from_depot(
    depot: &salvo::Depot,
) -> AppResult<Arc<dyn DbProvider + Send + Sync + 'static>> {
    depot
        .obtain::<Arc<dyn DbProvider + Send + Sync>>()
        .cloned()
        .map_err(|_err| {
            CoreError::InvariantViolation("Database provider not found in depot").into()
        })
}
