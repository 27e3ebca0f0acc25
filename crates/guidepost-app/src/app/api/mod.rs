mod deals;
mod feed;
mod healthcheck;
mod sources;
mod sync;
mod webhook;

use salvo::Router;
use serde::Serialize;

use crate::middleware::auth::{CredentialScope, RequireBasicAuth};

// Re-export route constants from core
pub use guidepost_core::constants::{
    APP_ROUTE_COMPONENT, FEED_ROUTE_COMPONENT, WEBHOOK_ROUTE_COMPONENT,
};

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// ## Summary
/// Constructs the main router: the public feed, the authenticated
/// webhook endpoint, and the operator surface.
#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(Router::with_path(FEED_ROUTE_COMPONENT).push(feed::routes()))
        .push(
            Router::with_path(WEBHOOK_ROUTE_COMPONENT)
                .hoop(RequireBasicAuth {
                    scope: CredentialScope::Webhook,
                })
                .push(webhook::routes()),
        )
        .push(
            Router::with_path(APP_ROUTE_COMPONENT)
                .push(healthcheck::routes())
                .push(
                    Router::new()
                        .hoop(RequireBasicAuth {
                            scope: CredentialScope::Operator,
                        })
                        .push(sync::routes())
                        .push(sources::routes())
                        .push(deals::routes()),
                ),
        )
}
