//! Ledger queries for bookings.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::enums::{BookingChannel, BookingStatus};
use crate::db::schema::booking;
use crate::model::booking::{Booking, NewBooking};

/// ## Summary
/// Loads all bookings whose status occupies a slot (`confirmed`,
/// `in_progress`), ordered by visit date and time.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn occupying(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<Booking>> {
    booking::table
        .filter(booking::status.eq_any(BookingStatus::OCCUPYING.to_vec()))
        .order((booking::visit_date.asc(), booking::visit_time.asc()))
        .select(Booking::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Looks up a booking by id.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
) -> diesel::QueryResult<Option<Booking>> {
    booking::table
        .find(id)
        .select(Booking::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Looks up a booking by its idempotency key `(channel, external_reference)`.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_external_key(
    conn: &mut DbConnection<'_>,
    channel: BookingChannel,
    reference: &str,
) -> diesel::QueryResult<Option<Booking>> {
    booking::table
        .filter(booking::channel.eq(channel))
        .filter(booking::external_reference.eq(reference))
        .select(Booking::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Creates or updates a booking keyed by `(channel, external_reference)`
/// in one atomic statement.
///
/// On conflict the mutable fields (visit date/time, duration, people
/// count, `updated_at`) take the incoming values; `status` and
/// `created_at` are left untouched, so the idempotency invariant holds
/// under concurrent deliveries.
///
/// ## Errors
/// Returns a database error if the statement fails.
pub async fn upsert_external(
    conn: &mut DbConnection<'_>,
    new: &NewBooking<'_>,
) -> diesel::QueryResult<Booking> {
    use diesel::upsert::excluded;

    diesel::insert_into(booking::table)
        .values(new)
        .on_conflict((booking::channel, booking::external_reference))
        .do_update()
        .set((
            booking::visit_date.eq(excluded(booking::visit_date)),
            booking::visit_time.eq(excluded(booking::visit_time)),
            booking::duration_minutes.eq(excluded(booking::duration_minutes)),
            booking::number_of_people.eq(excluded(booking::number_of_people)),
            booking::updated_at.eq(excluded(booking::updated_at)),
        ))
        .returning(Booking::as_select())
        .get_result(conn)
        .await
}

/// ## Summary
/// Compare-and-swap status update: applies `expected → next` only if the
/// row still holds `expected`.
///
/// ## Returns
/// The number of rows updated (0 when the booking changed concurrently
/// or does not exist).
///
/// ## Errors
/// Returns a database error if the statement fails.
pub async fn update_status_if(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    expected: BookingStatus,
    next: BookingStatus,
    at: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::update(booking::table.find(id))
        .filter(booking::status.eq(expected))
        .set((booking::status.eq(next), booking::updated_at.eq(at)))
        .execute(conn)
        .await
}
