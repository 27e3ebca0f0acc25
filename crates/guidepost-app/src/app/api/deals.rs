use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use tracing::error;

use guidepost_service::partner::{NewDeal, PartnerClient, PartnerError};

use super::ErrorResponse;
use crate::config::get_config_from_depot;

/// Builds a partner client, rendering the configuration error when the
/// credential pair is absent.
fn client_from_depot(depot: &Depot, res: &mut Response) -> Option<PartnerClient> {
    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return None;
        }
    };

    match PartnerClient::from_config(&config.partner) {
        Ok(client) => Some(client),
        Err(e @ PartnerError::MissingCredentials) => {
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new(e.to_string())));
            None
        }
        Err(e) => {
            error!(error = %e, "Failed to build partner client");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            None
        }
    }
}

fn render_partner_error(res: &mut Response, error: &PartnerError) {
    tracing::warn!(error = %error, "Partner deal call failed");
    res.status_code(StatusCode::BAD_GATEWAY);
    res.render(Json(ErrorResponse::new(error.to_string())));
}

/// ## Summary
/// POST /app/deals - Create a promotional deal at the partner.
///
/// ## Errors
/// Returns HTTP 400 for an invalid body
/// Returns HTTP 502 when the partner call fails
#[handler]
async fn create_deal(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let deal: NewDeal = match req.parse_json().await {
        Ok(d) => d,
        Err(e) => {
            error!(error = ?e, "Failed to parse create deal request");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new("Invalid request body")));
            return;
        }
    };

    let Some(client) = client_from_depot(depot, res) else {
        return;
    };

    match client.create_deal(&deal).await {
        Ok(created) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(created));
        }
        Err(e) => render_partner_error(res, &e),
    }
}

/// ## Summary
/// GET /app/deals?`product_id`=... - List a product's deals at the partner.
///
/// ## Errors
/// Returns HTTP 400 when `product_id` is missing
/// Returns HTTP 502 when the partner call fails
#[handler]
async fn list_deals(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(product_id) = req.query::<String>("product_id") else {
        res.status_code(StatusCode::BAD_REQUEST);
        res.render(Json(ErrorResponse::new("product_id is required")));
        return;
    };

    let Some(client) = client_from_depot(depot, res) else {
        return;
    };

    match client.list_deals(&product_id).await {
        Ok(deals) => res.render(Json(deals)),
        Err(e) => render_partner_error(res, &e),
    }
}

/// ## Summary
/// DELETE /`app/deals/{deal_id}` - Delete a deal at the partner.
///
/// ## Errors
/// Returns HTTP 400 when `deal_id` is missing
/// Returns HTTP 502 when the partner call fails
#[handler]
async fn delete_deal(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(deal_id) = req.param::<String>("deal_id") else {
        res.status_code(StatusCode::BAD_REQUEST);
        res.render(Json(ErrorResponse::new("Deal ID required")));
        return;
    };

    let Some(client) = client_from_depot(depot, res) else {
        return;
    };

    match client.delete_deal(&deal_id).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => render_partner_error(res, &e),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("deals")
        .get(list_deals)
        .post(create_deal)
        .push(Router::with_path("<deal_id>").delete(delete_deal))
}
