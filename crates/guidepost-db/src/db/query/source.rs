//! Queries over registered calendar sources.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::calendar_source;
use crate::model::source::{CalendarSource, NewCalendarSource};

/// ## Summary
/// Loads all registered sources in registration order.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn all(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<CalendarSource>> {
    calendar_source::table
        .order(calendar_source::created_at.asc())
        .select(CalendarSource::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Looks up a source by id.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
) -> diesel::QueryResult<Option<CalendarSource>> {
    calendar_source::table
        .find(id)
        .select(CalendarSource::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Registers a new calendar source.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new: &NewCalendarSource<'_>,
) -> diesel::QueryResult<CalendarSource> {
    diesel::insert_into(calendar_source::table)
        .values(new)
        .returning(CalendarSource::as_select())
        .get_result(conn)
        .await
}

/// ## Summary
/// Enables or disables a source.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn set_enabled(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    enabled: bool,
) -> diesel::QueryResult<usize> {
    diesel::update(calendar_source::table.find(id))
        .set(calendar_source::enabled.eq(enabled))
        .execute(conn)
        .await
}

/// ## Summary
/// Removes a source. Its busy intervals disappear from the next merge
/// cycle; past bookings are unaffected.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> diesel::QueryResult<usize> {
    diesel::delete(calendar_source::table.find(id))
        .execute(conn)
        .await
}

/// ## Summary
/// Records a successful sync for a source. Called only for sources whose
/// fetch succeeded; failed sources keep their previous timestamp.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn touch_last_synced(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    at: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::update(calendar_source::table.find(id))
        .set(calendar_source::last_synced_at.eq(at))
        .execute(conn)
        .await
}
