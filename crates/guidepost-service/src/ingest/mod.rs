//! Idempotent ingestion of externally-originated bookings.

mod decode;

pub use self::decode::{BookingDraft, DecodeError, decode_payload};

use chrono::{DateTime, Utc};

use guidepost_db::db::connection::DbConnection;
use guidepost_db::db::enums::BookingStatus;
use guidepost_db::db::query;
use guidepost_db::model::booking::{Booking, NewBooking};

use crate::error::{ServiceError, ServiceResult};
use crate::events::{ChangeEvent, ChangeFeed};
use crate::ledger;

/// What a webhook delivery did to the ledger.
#[derive(Debug)]
pub struct IngestOutcome {
    pub booking: Booking,
    /// True when the delivery created the booking rather than updating it.
    pub created: bool,
}

/// ## Summary
/// Resolves the configured default status for webhook-created bookings.
///
/// ## Errors
/// Returns a configuration error unless the value is `confirmed` or
/// `pending`, the only statuses a fresh external booking may start in.
pub fn default_status_from_config(value: &str) -> ServiceResult<BookingStatus> {
    match BookingStatus::parse(value) {
        Some(status @ (BookingStatus::Confirmed | BookingStatus::Pending)) => Ok(status),
        _ => Err(ServiceError::InvalidConfiguration(format!(
            "webhook.default_status must be 'confirmed' or 'pending', got '{value}'"
        ))),
    }
}

/// ## Summary
/// Applies a decoded booking draft to the ledger, keyed by
/// `(channel, external_reference)`.
///
/// The write is a single `INSERT .. ON CONFLICT DO UPDATE`, so two
/// concurrent deliveries with the same key settle on one row with the
/// last update applied. Updates never change status; a cancellation
/// signal additionally walks the status machine (a no-op when the
/// booking is already cancelled).
///
/// ## Errors
/// - database errors from the upsert or transition
/// - `IllegalTransition` when cancelling a completed booking
#[tracing::instrument(skip(conn, draft, events), fields(channel = %draft.channel, reference = %draft.external_reference))]
pub async fn ingest_booking(
    conn: &mut DbConnection<'_>,
    draft: &BookingDraft,
    default_status: BookingStatus,
    events: &ChangeFeed,
) -> ServiceResult<IngestOutcome> {
    let at = Utc::now();

    let new = NewBooking {
        id: uuid::Uuid::now_v7(),
        visit_date: draft.visit_date,
        visit_time: draft.visit_time,
        duration_minutes: draft.duration_minutes,
        status: default_status,
        channel: draft.channel,
        external_reference: Some(&draft.external_reference),
        number_of_people: draft.number_of_people,
        created_at: at,
        updated_at: at,
    };

    let mut booking = query::booking::upsert_external(conn, &new).await?;
    let created = booking.created_at == booking.updated_at;

    if draft.cancelled && booking.status != BookingStatus::Cancelled {
        booking = ledger::transition(conn, booking.id, BookingStatus::Cancelled, at).await?;
        events.publish(ChangeEvent::BookingCancelled {
            booking_id: booking.id,
        });
    }

    events.publish(ChangeEvent::BookingUpserted {
        booking_id: booking.id,
        channel: booking.channel,
        created,
    });

    tracing::info!(
        booking_id = %booking.id,
        created,
        cancelled = draft.cancelled,
        "Webhook booking ingested"
    );

    Ok(IngestOutcome { booking, created })
}
