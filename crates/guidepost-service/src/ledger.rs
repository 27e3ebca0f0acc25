//! The booking ledger interface.
//!
//! Queries live in `guidepost-db`; the rules (which bookings occupy a
//! slot, and which status transitions are legal) are enforced here.

use chrono::{DateTime, Duration, Utc};

use guidepost_db::db::connection::DbConnection;
use guidepost_db::db::enums::BookingStatus;
use guidepost_db::db::query;
use guidepost_db::model::booking::Booking;

use crate::error::{ServiceError, ServiceResult};
use crate::sync::merge::{OccupiedRange, Origin};

/// ## Summary
/// Projects bookings onto ledger-origin occupied ranges. Non-occupying
/// statuses are filtered out regardless of what the caller loaded.
#[must_use]
pub fn to_occupied_ranges(bookings: &[Booking], default_duration: Duration) -> Vec<OccupiedRange> {
    bookings
        .iter()
        .filter(|b| b.status.is_occupying())
        .map(|b| OccupiedRange {
            origin: Origin::Ledger,
            uid: b.id.to_string(),
            start: b.starts_at(),
            end: b.ends_at(default_duration),
            label: Some(b.channel.to_string()),
        })
        .collect()
}

/// ## Summary
/// Applies a status transition through the booking state machine.
///
/// The update is a compare-and-swap against the status that was read, so
/// two concurrent transitions cannot both apply.
///
/// ## Errors
/// - `NotFound` if the booking does not exist
/// - `IllegalTransition` if the state machine forbids the move
/// - `Conflict` if the booking's status changed concurrently
#[tracing::instrument(skip(conn))]
pub async fn transition(
    conn: &mut DbConnection<'_>,
    booking_id: uuid::Uuid,
    next: BookingStatus,
    at: DateTime<Utc>,
) -> ServiceResult<Booking> {
    let current = query::booking::by_id(conn, booking_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("booking {booking_id}")))?;

    if !current.status.can_transition_to(next) {
        return Err(ServiceError::IllegalTransition {
            from: current.status,
            to: next,
        });
    }

    let updated =
        query::booking::update_status_if(conn, booking_id, current.status, next, at).await?;
    if updated == 0 {
        return Err(ServiceError::Conflict(format!(
            "booking {booking_id} changed concurrently"
        )));
    }

    tracing::info!(booking_id = %booking_id, from = %current.status, to = %next, "Booking status updated");

    Ok(Booking {
        status: next,
        updated_at: at,
        ..current
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use guidepost_db::db::enums::BookingChannel;

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: uuid::Uuid::new_v4(),
            visit_date: NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            visit_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: Some(90),
            status,
            channel: BookingChannel::Direct,
            external_reference: None,
            number_of_people: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_occupying_bookings_become_ranges() {
        let bookings = vec![
            booking(BookingStatus::Confirmed),
            booking(BookingStatus::InProgress),
            booking(BookingStatus::Pending),
            booking(BookingStatus::Completed),
            booking(BookingStatus::Cancelled),
        ];

        let ranges = to_occupied_ranges(&bookings, Duration::minutes(60));
        assert_eq!(ranges.len(), 2);
        assert!(ranges.iter().all(|r| r.origin == Origin::Ledger));
    }

    #[test]
    fn range_times_match_the_booking() {
        let b = booking(BookingStatus::Confirmed);
        let ranges = to_occupied_ranges(std::slice::from_ref(&b), Duration::minutes(60));

        assert_eq!(
            ranges[0].start,
            Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap()
        );
        assert_eq!(ranges[0].end, ranges[0].start + Duration::minutes(90));
        assert_eq!(ranges[0].uid, b.id.to_string());
    }
}
