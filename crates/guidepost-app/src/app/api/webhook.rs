use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;
use tracing::error;

use guidepost_db::db::enums::{BookingChannel, BookingStatus};
use guidepost_service::error::ServiceError;
use guidepost_service::ingest::{self, DecodeError};

use super::ErrorResponse;
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::state::get_events_from_depot;

/// ## Summary
/// Successful ingestion response payload
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub booking_id: String,
    pub external_reference: String,
    pub status: BookingStatus,
}

/// ## Summary
/// POST /`webhooks/{channel}` - Absorb an externally-originated booking.
///
/// The caller is already authenticated by the webhook Basic Auth hoop.
/// The body is decoded through the channel's typed payload shape and
/// upserted by `(channel, external_reference)`.
///
/// ## Errors
/// Returns HTTP 404 for an unknown or non-webhook channel
/// Returns HTTP 400 for a malformed or invalid payload
/// Returns HTTP 409 when a cancellation hits a terminal booking
/// Returns HTTP 500 if database operations fail
#[handler]
async fn receive_booking(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing webhook delivery");

    let Some(channel_param) = req.param::<String>("channel") else {
        res.status_code(StatusCode::BAD_REQUEST);
        res.render(Json(ErrorResponse::new("Channel is required")));
        return;
    };

    let Some(channel) = BookingChannel::parse(&channel_param) else {
        res.status_code(StatusCode::NOT_FOUND);
        res.render(Json(ErrorResponse::new(format!(
            "Unknown channel '{channel_param}'"
        ))));
        return;
    };

    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    let default_status = match ingest::default_status_from_config(&config.webhook.default_status) {
        Ok(status) => status,
        Err(e) => {
            error!(error = %e, "Webhook default status is misconfigured");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Webhook ingestion is misconfigured")));
            return;
        }
    };

    let body = match req.payload().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            error!(error = ?e, "Failed to read webhook body");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new("Unreadable request body")));
            return;
        }
    };

    let draft = match ingest::decode_payload(channel, &body) {
        Ok(draft) => draft,
        Err(e @ DecodeError::UnsupportedChannel(_)) => {
            res.status_code(StatusCode::NOT_FOUND);
            res.render(Json(ErrorResponse::new(e.to_string())));
            return;
        }
        Err(e) => {
            tracing::debug!(channel = %channel, error = %e, "Rejecting malformed webhook payload");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new(e.to_string())));
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

    let events = match get_events_from_depot(depot) {
        Ok(feed) => feed,
        Err(e) => {
            error!(error = ?e, "Failed to get change feed");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            res.status_code(StatusCode::SERVICE_UNAVAILABLE);
            res.render(Json(ErrorResponse::new("Database unavailable")));
            return;
        }
    };

    match ingest::ingest_booking(&mut conn, &draft, default_status, &events).await {
        Ok(outcome) => {
            res.status_code(if outcome.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            });
            res.render(Json(WebhookResponse {
                booking_id: outcome.booking.id.to_string(),
                external_reference: draft.external_reference,
                status: outcome.booking.status,
            }));
        }
        Err(e @ ServiceError::IllegalTransition { .. }) => {
            tracing::warn!(reference = %draft.external_reference, error = %e, "Rejecting webhook transition");
            res.status_code(StatusCode::CONFLICT);
            res.render(Json(ErrorResponse::new(e.to_string())));
        }
        Err(e) => {
            error!(error = %e, "Failed to ingest webhook booking");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Failed to ingest booking")));
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("<channel>").post(receive_booking)
}
