//! Channel-specific webhook payload decoding.
//!
//! Every channel gets its own typed payload shape; a delivery either
//! decodes into a normalized [`BookingDraft`] or fails with a typed
//! error. Untyped JSON never reaches the ledger.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use thiserror::Error;

use guidepost_db::db::enums::BookingChannel;

/// Why a webhook payload could not be decoded.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid payload: {0}")]
    Invalid(String),

    #[error("channel {0} does not accept webhook bookings")]
    UnsupportedChannel(BookingChannel),
}

/// A normalized booking draft, ready for the idempotent upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub channel: BookingChannel,
    pub external_reference: String,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub duration_minutes: Option<i32>,
    pub number_of_people: i32,
    /// Set when the payload explicitly signals a cancellation.
    pub cancelled: bool,
}

/// The supplier partner wraps booking data in an action envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartnerPayload {
    action: PartnerAction,
    booking: PartnerBooking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PartnerAction {
    Created,
    Updated,
    Cancelled,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartnerBooking {
    reference: String,
    travel_date: NaiveDate,
    travel_time: NaiveTime,
    participants: i32,
    #[serde(default)]
    duration_minutes: Option<i32>,
}

/// Agency resellers post a flat payload with an optional status marker.
#[derive(Debug, Deserialize)]
struct AgencyPayload {
    reference: String,
    date: NaiveDate,
    time: NaiveTime,
    people: i32,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    duration_minutes: Option<i32>,
}

/// ## Summary
/// Decodes a channel's webhook body into a normalized booking draft.
///
/// ## Errors
/// - `Json` when the body is not the channel's shape
/// - `Invalid` when decoded values fail validation
/// - `UnsupportedChannel` for channels without webhook ingestion
pub fn decode_payload(channel: BookingChannel, body: &[u8]) -> Result<BookingDraft, DecodeError> {
    match channel {
        BookingChannel::Direct => Err(DecodeError::UnsupportedChannel(channel)),
        BookingChannel::Partner => {
            let payload: PartnerPayload = serde_json::from_slice(body)?;
            let draft = BookingDraft {
                channel,
                external_reference: payload.booking.reference,
                visit_date: payload.booking.travel_date,
                visit_time: payload.booking.travel_time,
                duration_minutes: payload.booking.duration_minutes,
                number_of_people: payload.booking.participants,
                cancelled: payload.action == PartnerAction::Cancelled,
            };
            validate(draft)
        }
        BookingChannel::Agency => {
            let payload: AgencyPayload = serde_json::from_slice(body)?;
            let cancelled = payload.status.as_deref() == Some("cancelled");
            let draft = BookingDraft {
                channel,
                external_reference: payload.reference,
                visit_date: payload.date,
                visit_time: payload.time,
                duration_minutes: payload.duration_minutes,
                number_of_people: payload.people,
                cancelled,
            };
            validate(draft)
        }
    }
}

fn validate(draft: BookingDraft) -> Result<BookingDraft, DecodeError> {
    if draft.external_reference.trim().is_empty() {
        return Err(DecodeError::Invalid("empty booking reference".to_string()));
    }
    if draft.number_of_people < 1 {
        return Err(DecodeError::Invalid(format!(
            "participant count must be positive, got {}",
            draft.number_of_people
        )));
    }
    if let Some(duration) = draft.duration_minutes
        && duration < 1
    {
        return Err(DecodeError::Invalid(format!(
            "duration must be positive, got {duration}"
        )));
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_payload_decodes() {
        let body = br#"{
            "action": "created",
            "booking": {
                "reference": "GP-1001",
                "travelDate": "2026-08-05",
                "travelTime": "10:00:00",
                "participants": 4,
                "durationMinutes": 90
            }
        }"#;

        let draft = decode_payload(BookingChannel::Partner, body).unwrap();
        assert_eq!(draft.external_reference, "GP-1001");
        assert_eq!(draft.number_of_people, 4);
        assert_eq!(draft.duration_minutes, Some(90));
        assert!(!draft.cancelled);
    }

    #[test]
    fn partner_cancellation_sets_the_flag() {
        let body = br#"{
            "action": "cancelled",
            "booking": {
                "reference": "GP-1001",
                "travelDate": "2026-08-05",
                "travelTime": "10:00:00",
                "participants": 4
            }
        }"#;

        let draft = decode_payload(BookingChannel::Partner, body).unwrap();
        assert!(draft.cancelled);
    }

    #[test]
    fn agency_payload_decodes() {
        let body = br#"{
            "reference": "AG-77",
            "date": "2026-08-06",
            "time": "14:30:00",
            "people": 2,
            "status": "cancelled"
        }"#;

        let draft = decode_payload(BookingChannel::Agency, body).unwrap();
        assert_eq!(draft.external_reference, "AG-77");
        assert!(draft.cancelled);
        assert_eq!(draft.duration_minutes, None);
    }

    #[test]
    fn malformed_json_is_a_typed_error() {
        let error = decode_payload(BookingChannel::Partner, b"not json").unwrap_err();
        assert!(matches!(error, DecodeError::Json(_)));
    }

    #[test]
    fn wrong_shape_is_a_typed_error() {
        let error = decode_payload(BookingChannel::Partner, br#"{"foo": 1}"#).unwrap_err();
        assert!(matches!(error, DecodeError::Json(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let body = br#"{
            "action": "created",
            "booking": {
                "reference": "GP-1002",
                "travelDate": "2026-08-05",
                "travelTime": "10:00:00",
                "participants": 0
            }
        }"#;

        let error = decode_payload(BookingChannel::Partner, body).unwrap_err();
        assert!(matches!(error, DecodeError::Invalid(_)));
    }

    #[test]
    fn direct_channel_rejects_webhooks() {
        let error = decode_payload(BookingChannel::Direct, b"{}").unwrap_err();
        assert!(matches!(error, DecodeError::UnsupportedChannel(_)));
    }
}
