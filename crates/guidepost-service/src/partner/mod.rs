//! Outbound partner adapter.
//!
//! One authenticated HTTP call per operation against the supplier API.
//! Missing credentials fail at construction, before any network attempt;
//! transport failures, error statuses, and `success: false` envelopes all
//! surface as a single typed error. Retry policy belongs to the caller.

mod types;

pub use self::types::{Availability, DateRange, Deal, NewDeal};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::de::DeserializeOwned;
use thiserror::Error;

use guidepost_core::config::PartnerConfig;

use crate::sync::merge::OccupiedRange;
use self::types::{AvailabilityPush, Envelope};

/// ## Summary
/// Projects merged occupied ranges into partner availability entries:
/// every occupied slot is pushed with zero vacancies.
#[must_use]
pub fn occupied_to_availability(occupied: &[OccupiedRange]) -> Vec<Availability> {
    occupied
        .iter()
        .map(|range| Availability {
            date_time: range.start,
            vacancies: 0,
            currency: None,
            price: None,
        })
        .collect()
}

/// Failures surfaced by partner calls.
#[derive(Error, Debug)]
pub enum PartnerError {
    #[error("partner credentials are not configured")]
    MissingCredentials,

    #[error("partner request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("partner API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected partner response: {0}")]
    UnexpectedPayload(String),
}

/// Authenticated client for the supplier partner API.
#[derive(Debug)]
pub struct PartnerClient {
    http: reqwest::Client,
    auth_header: String,
    sandbox: bool,
    sandbox_url: String,
    production_url: String,
}

impl PartnerClient {
    /// ## Summary
    /// Builds a client from configuration. The credential pair is encoded
    /// once into the `Authorization` header value.
    ///
    /// ## Errors
    /// Returns `MissingCredentials` when either half of the credential
    /// pair is absent, reported here so no call ever goes out
    /// unauthenticated.
    pub fn from_config(config: &PartnerConfig) -> Result<Self, PartnerError> {
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            return Err(PartnerError::MissingCredentials);
        };

        let auth_header = format!(
            "Basic {}",
            BASE64.encode(format!("{username}:{password}"))
        );

        Ok(Self {
            http: reqwest::Client::new(),
            auth_header,
            sandbox: config.sandbox,
            sandbox_url: config.sandbox_url.trim_end_matches('/').to_string(),
            production_url: config.production_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves the base URL from the routing flag.
    fn endpoint(&self, path: &str) -> String {
        let base = if self.sandbox {
            &self.sandbox_url
        } else {
            &self.production_url
        };
        format!("{base}/{path}")
    }

    /// ## Summary
    /// Replaces the partner's availability for one product in a single
    /// push.
    ///
    /// ## Errors
    /// Returns a `PartnerError` on transport, status, or payload failure;
    /// nothing is partially applied locally on failure.
    #[tracing::instrument(skip(self, availabilities), fields(count = availabilities.len()))]
    pub async fn push_availability(
        &self,
        product_id: &str,
        availabilities: &[Availability],
    ) -> Result<(), PartnerError> {
        let body = AvailabilityPush {
            product_id,
            availabilities,
        };
        let request = self.http.post(self.endpoint("availabilities")).json(&body);
        let _ack: Option<serde_json::Value> = self.execute(request).await?;

        tracing::info!(product_id, count = availabilities.len(), "Availability pushed");
        Ok(())
    }

    /// ## Summary
    /// Creates a time-limited promotional deal.
    ///
    /// ## Errors
    /// Returns a `PartnerError` on transport, status, or payload failure.
    #[tracing::instrument(skip(self, deal), fields(deal_name = %deal.deal_name))]
    pub async fn create_deal(&self, deal: &NewDeal) -> Result<Deal, PartnerError> {
        let request = self.http.post(self.endpoint("deals")).json(deal);
        let created: Option<Deal> = self.execute(request).await?;

        created.ok_or_else(|| {
            PartnerError::UnexpectedPayload("deal missing from create response".to_string())
        })
    }

    /// ## Summary
    /// Lists the deals registered for a product.
    ///
    /// ## Errors
    /// Returns a `PartnerError` on transport, status, or payload failure.
    #[tracing::instrument(skip(self))]
    pub async fn list_deals(&self, product_id: &str) -> Result<Vec<Deal>, PartnerError> {
        let request = self
            .http
            .get(self.endpoint("deals"))
            .query(&[("externalProductId", product_id)]);
        let deals: Option<Vec<Deal>> = self.execute(request).await?;

        Ok(deals.unwrap_or_default())
    }

    /// ## Summary
    /// Deletes a deal by the partner's deal id.
    ///
    /// ## Errors
    /// Returns a `PartnerError` on transport, status, or payload failure.
    #[tracing::instrument(skip(self))]
    pub async fn delete_deal(&self, deal_id: &str) -> Result<(), PartnerError> {
        let request = self.http.delete(self.endpoint(&format!("deals/{deal_id}")));
        let _ack: Option<serde_json::Value> = self.execute(request).await?;

        tracing::info!(deal_id, "Deal deleted");
        Ok(())
    }

    /// Sends one authenticated request and decodes the response envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, PartnerError> {
        let response = request
            .header(reqwest::header::AUTHORIZATION, self.auth_header.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PartnerError::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| PartnerError::UnexpectedPayload(e.to_string()))?;

        if !envelope.success {
            return Err(PartnerError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "unspecified partner error".to_string()),
            });
        }

        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> PartnerConfig {
        PartnerConfig {
            username: Some("tours".to_string()),
            password: Some("secret".to_string()),
            product_id: Some("product-7".to_string()),
            sandbox: true,
            sandbox_url: server.uri(),
            production_url: "https://unused.example.com".to_string(),
        }
    }

    fn availability() -> Availability {
        Availability {
            date_time: chrono::Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap(),
            vacancies: 6,
            currency: Some("EUR".to_string()),
            price: Some(39.5),
        }
    }

    #[test]
    fn missing_credentials_fail_before_any_request() {
        let config = PartnerConfig {
            username: Some("tours".to_string()),
            password: None,
            product_id: None,
            sandbox: true,
            sandbox_url: "https://sandbox.example.com".to_string(),
            production_url: "https://live.example.com".to_string(),
        };

        let error = PartnerClient::from_config(&config).unwrap_err();
        assert!(matches!(error, PartnerError::MissingCredentials));
    }

    #[test]
    fn occupied_ranges_push_as_zero_vacancies() {
        use crate::sync::merge::Origin;

        let start = chrono::Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap();
        let occupied = vec![OccupiedRange {
            origin: Origin::Ledger,
            uid: "b-1".to_string(),
            start,
            end: start + chrono::Duration::minutes(90),
            label: None,
        }];

        let entries = occupied_to_availability(&occupied);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date_time, start);
        assert_eq!(entries[0].vacancies, 0);
    }

    #[tokio::test]
    async fn push_availability_sends_basic_auth() {
        let server = MockServer::start().await;
        // base64("tours:secret")
        Mock::given(method("POST"))
            .and(path("/availabilities"))
            .and(header("authorization", "Basic dG91cnM6c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PartnerClient::from_config(&config(&server)).unwrap();
        client
            .push_availability("product-7", &[availability()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn error_status_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = PartnerClient::from_config(&config(&server)).unwrap();
        let error = client
            .push_availability("product-7", &[availability()])
            .await
            .unwrap_err();

        assert!(matches!(error, PartnerError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn unsuccessful_envelope_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "unknown product"
            })))
            .mount(&server)
            .await;

        let client = PartnerClient::from_config(&config(&server)).unwrap();
        let error = client
            .push_availability("missing", &[availability()])
            .await
            .unwrap_err();

        let PartnerError::Api { status, message } = error else {
            panic!("expected api error");
        };
        assert_eq!(status, 200);
        assert_eq!(message, "unknown product");
    }

    #[tokio::test]
    async fn deal_lifecycle_round_trips() {
        let server = MockServer::start().await;
        let deal_json = json!({
            "dealId": "deal-11",
            "externalProductId": "product-7",
            "dealName": "Late summer",
            "dateRange": { "from": "2026-08-10", "to": "2026-08-31" },
            "discountPercentage": 15,
            "noticePeriodDays": 2
        });

        Mock::given(method("POST"))
            .and(path("/deals"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "data": deal_json })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/deals"))
            .and(query_param("externalProductId", "product-7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "data": [deal_json] })),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/deals/deal-11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let client = PartnerClient::from_config(&config(&server)).unwrap();

        let created = client
            .create_deal(&NewDeal {
                external_product_id: "product-7".to_string(),
                deal_name: "Late summer".to_string(),
                date_range: DateRange {
                    from: chrono::NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
                    to: chrono::NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
                },
                discount_percentage: 15,
                notice_period_days: 2,
            })
            .await
            .unwrap();
        assert_eq!(created.deal_id, "deal-11");

        let listed = client.list_deals("product-7").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].deal_name, "Late summer");

        client.delete_deal("deal-11").await.unwrap();
    }
}
