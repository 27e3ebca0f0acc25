//! Shared-credential Basic Auth for the webhook and operator surfaces.
//!
//! A missing or wrong credential gets 401 plus a challenge header,
//! distinctly from payload errors, which the handlers report as 400.
//! Unconfigured credentials are a configuration error (500), reported
//! before any request body is touched.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use salvo::Depot;
use salvo::http::{StatusCode, header};
use salvo::writing::Json;
use tracing::error;

use crate::app::api::ErrorResponse;
use crate::config::get_config_from_depot;

/// Which credential pair a route is guarded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScope {
    /// Inbound booking webhooks.
    Webhook,
    /// Operator actions: manual sync, source management, deals.
    Operator,
}

/// Middleware handler enforcing Basic Auth for one credential scope.
pub struct RequireBasicAuth {
    pub scope: CredentialScope,
}

#[salvo::async_trait]
impl salvo::Handler for RequireBasicAuth {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        scope = ?self.scope,
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let (username, password) = match self.scope {
            CredentialScope::Webhook => (&config.webhook.username, &config.webhook.password),
            CredentialScope::Operator => (&config.operator.username, &config.operator.password),
        };

        let (Some(username), Some(password)) = (username, password) else {
            error!(scope = ?self.scope, "Shared credentials are not configured");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse {
                error: "Credentials are not configured".to_string(),
            }));
            ctrl.skip_rest();
            return;
        };

        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match authorization {
            Some(header_value) if verify_basic(header_value, username, password) => {
                tracing::trace!("Request authenticated");
            }
            _ => {
                tracing::debug!(scope = ?self.scope, "Rejecting unauthenticated request");
                res.status_code(StatusCode::UNAUTHORIZED);
                res.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    header::HeaderValue::from_static("Basic realm=\"guidepost\""),
                );
                res.render(Json(ErrorResponse {
                    error: "Authentication required".to_string(),
                }));
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Checks an `Authorization` header value against a credential pair.
#[must_use]
pub fn verify_basic(header_value: &str, username: &str, password: &str) -> bool {
    let Some(encoded) = header_value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = BASE64.decode(encoded.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((user, pass)) = decoded.split_once(':') else {
        return false;
    };

    user == username && pass == password
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(credentials: &str) -> String {
        format!("Basic {}", BASE64.encode(credentials))
    }

    #[test_log::test]
    fn matching_credentials_pass() {
        assert!(verify_basic(&encode("ops:hunter2"), "ops", "hunter2"));
    }

    #[test]
    fn wrong_password_fails() {
        assert!(!verify_basic(&encode("ops:nope"), "ops", "hunter2"));
    }

    #[test]
    fn wrong_scheme_fails() {
        assert!(!verify_basic("Bearer abcdef", "ops", "hunter2"));
    }

    #[test]
    fn garbage_encoding_fails() {
        assert!(!verify_basic("Basic !!!", "ops", "hunter2"));
    }

    #[test]
    fn missing_separator_fails() {
        assert!(!verify_basic(&encode("opshunter2"), "ops", "hunter2"));
    }

    #[test]
    fn password_may_contain_colons() {
        assert!(verify_basic(&encode("ops:a:b:c"), "ops", "a:b:c"));
    }
}
