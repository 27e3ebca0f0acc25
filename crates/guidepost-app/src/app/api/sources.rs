use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Deserialize;
use tracing::error;

use guidepost_db::db::query;
use guidepost_db::model::source::NewCalendarSource;

use super::ErrorResponse;
use crate::db_handler::get_db_from_depot;

/// ## Summary
/// Create source request payload
#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
    pub feed_url: String,
    pub color_tag: Option<String>,
    pub enabled: Option<bool>,
}

/// ## Summary
/// Update source request payload
#[derive(Debug, Deserialize)]
pub struct UpdateSourceRequest {
    pub enabled: bool,
}

/// Accepts only absolute http(s) URLs; anything else is a configuration
/// error caught before the source can ever be fetched.
fn validate_feed_url(feed_url: &str) -> Result<(), String> {
    match reqwest::Url::parse(feed_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(url) => Err(format!("unsupported URL scheme '{}'", url.scheme())),
        Err(e) => Err(format!("invalid URL: {e}")),
    }
}

/// ## Summary
/// GET /app/sources - List the registered calendar sources.
///
/// ## Errors
/// Returns HTTP 500 if database operations fail
#[handler]
async fn list_sources(depot: &mut Depot, res: &mut Response) {
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

    match query::source::all(&mut conn).await {
        Ok(sources) => res.render(Json(sources)),
        Err(e) => {
            error!(error = ?e, "Failed to list sources");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Failed to list sources")));
        }
    }
}

/// ## Summary
/// POST /app/sources - Register a calendar source.
///
/// ## Errors
/// Returns HTTP 400 for an empty name or a URL that is not absolute http(s)
/// Returns HTTP 500 if database operations fail
#[handler]
async fn create_source(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let create_req: CreateSourceRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse create source request");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new("Invalid request body")));
            return;
        }
    };

    if create_req.name.trim().is_empty() {
        res.status_code(StatusCode::BAD_REQUEST);
        res.render(Json(ErrorResponse::new("Source name is required")));
        return;
    }

    if let Err(reason) = validate_feed_url(&create_req.feed_url) {
        res.status_code(StatusCode::BAD_REQUEST);
        res.render(Json(ErrorResponse::new(reason)));
        return;
    }

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

    let new_source = NewCalendarSource {
        id: uuid::Uuid::now_v7(),
        name: create_req.name.trim(),
        feed_url: &create_req.feed_url,
        color_tag: create_req.color_tag.as_deref(),
        enabled: create_req.enabled.unwrap_or(true),
    };

    match query::source::insert(&mut conn, &new_source).await {
        Ok(source) => {
            tracing::info!(source_id = %source.id, name = %source.name, "Calendar source registered");
            res.status_code(StatusCode::CREATED);
            res.render(Json(source));
        }
        Err(e) => {
            error!(error = ?e, "Failed to create source");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Failed to create source")));
        }
    }
}

/// ## Summary
/// PATCH /`app/sources/{source_id}` - Enable or disable a source.
///
/// ## Errors
/// Returns HTTP 404 if the source does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn update_source(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(source_id) = parse_source_id(req, res) else {
        return;
    };

    let update_req: UpdateSourceRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse update source request");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new("Invalid request body")));
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

    match query::source::set_enabled(&mut conn, source_id, update_req.enabled).await {
        Ok(0) => {
            res.status_code(StatusCode::NOT_FOUND);
            res.render(Json(ErrorResponse::new("Source not found")));
        }
        Ok(_rows) => {
            tracing::info!(source_id = %source_id, enabled = update_req.enabled, "Calendar source updated");
            match query::source::by_id(&mut conn, source_id).await {
                Ok(Some(source)) => res.render(Json(source)),
                Ok(None) => {
                    res.status_code(StatusCode::NOT_FOUND);
                    res.render(Json(ErrorResponse::new("Source not found")));
                }
                Err(e) => {
                    error!(error = ?e, "Failed to reload source");
                    res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                    res.render(Json(ErrorResponse::new("Failed to update source")));
                }
            }
        }
        Err(e) => {
            error!(error = ?e, "Failed to update source");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Failed to update source")));
        }
    }
}

/// ## Summary
/// DELETE /`app/sources/{source_id}` - Remove a source from future merges.
///
/// ## Errors
/// Returns HTTP 404 if the source does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn delete_source(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(source_id) = parse_source_id(req, res) else {
        return;
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

    match query::source::delete(&mut conn, source_id).await {
        Ok(0) => {
            res.status_code(StatusCode::NOT_FOUND);
            res.render(Json(ErrorResponse::new("Source not found")));
        }
        Ok(_rows) => {
            tracing::info!(source_id = %source_id, "Calendar source deleted");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => {
            error!(error = ?e, "Failed to delete source");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Failed to delete source")));
        }
    }
}

fn parse_source_id(req: &Request, res: &mut Response) -> Option<uuid::Uuid> {
    let Some(raw) = req.param::<String>("source_id") else {
        res.status_code(StatusCode::BAD_REQUEST);
        res.render(Json(ErrorResponse::new("Source ID required")));
        return None;
    };

    match uuid::Uuid::parse_str(&raw) {
        Ok(id) => Some(id),
        Err(_e) => {
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new("Invalid source ID format")));
            None
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("sources")
        .get(list_sources)
        .post(create_source)
        .push(
            Router::with_path("<source_id>")
                .patch(update_source)
                .delete(delete_source),
        )
}
