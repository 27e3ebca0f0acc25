use salvo::http::header::{self, HeaderValue};
use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use tracing::error;

use guidepost_core::constants::FEED_FILE_NAME;
use guidepost_db::db::query;
use guidepost_service::feed::export;

use super::ErrorResponse;
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;

/// ## Summary
/// GET /feed/calendar.ics - The publicly fetchable outbound feed.
///
/// One VEVENT per occupying booking; served with a strong `ETag` and
/// `If-None-Match` support so partners can poll cheaply.
///
/// ## Errors
/// Returns HTTP 500/503 if configuration or database access fails.
#[handler]
async fn serve_feed(req: &mut Request, depot: &mut Depot, res: &mut Response) {
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

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            res.status_code(StatusCode::SERVICE_UNAVAILABLE);
            res.render(Json(ErrorResponse::new("Database unavailable")));
            return;
        }
    };

    let bookings = match query::booking::occupying(&mut conn).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = ?e, "Failed to load occupying bookings");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Failed to build feed")));
            return;
        }
    };

    let default_duration =
        chrono::Duration::minutes(i64::from(config.sync.default_event_duration_minutes));
    let document = export::serialize_feed(&bookings, default_duration);
    let etag = export::feed_etag(&document);

    let if_none_match = req
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok());
    if if_none_match == Some(etag.as_str()) {
        res.status_code(StatusCode::NOT_MODIFIED);
        return;
    }

    if let Ok(etag_value) = HeaderValue::from_str(&etag) {
        res.headers_mut().insert(header::ETAG, etag_value);
    }
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/calendar; charset=utf-8"),
    );
    res.body(document);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(FEED_FILE_NAME).get(serve_feed)
}
