use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use diesel::{pg::Pg, prelude::*};

use crate::db::{
    enums::{BookingChannel, BookingStatus},
    schema,
};

/// A row in the authoritative booking ledger.
///
/// Visit date and time are UTC wall-clock values.
#[derive(
    Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize,
)]
#[diesel(table_name = schema::booking)]
#[diesel(check_for_backend(Pg))]
pub struct Booking {
    pub id: uuid::Uuid,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub duration_minutes: Option<i32>,
    pub status: BookingStatus,
    pub channel: BookingChannel,
    pub external_reference: Option<String>,
    pub number_of_people: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns the slot start as a UTC instant.
    #[must_use]
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.visit_date.and_time(self.visit_time).and_utc()
    }

    /// Returns the slot end, falling back to `default_duration` when no
    /// explicit duration is stored.
    #[must_use]
    pub fn ends_at(&self, default_duration: Duration) -> DateTime<Utc> {
        let duration = self
            .duration_minutes
            .map_or(default_duration, |minutes| Duration::minutes(minutes.into()));
        self.starts_at() + duration
    }
}

/// Insert struct for creating or upserting bookings
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::booking)]
pub struct NewBooking<'a> {
    pub id: uuid::Uuid,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub duration_minutes: Option<i32>,
    pub status: BookingStatus,
    pub channel: BookingChannel,
    pub external_reference: Option<&'a str>,
    pub number_of_people: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
