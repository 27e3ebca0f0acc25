use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// A registered external calendar feed (read-only for the engine apart
/// from `last_synced_at`).
#[derive(
    Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize,
)]
#[diesel(table_name = schema::calendar_source)]
#[diesel(check_for_backend(Pg))]
pub struct CalendarSource {
    pub id: uuid::Uuid,
    pub name: String,
    pub feed_url: String,
    pub color_tag: Option<String>,
    pub enabled: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert struct for registering a calendar source
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::calendar_source)]
pub struct NewCalendarSource<'a> {
    pub id: uuid::Uuid,
    pub name: &'a str,
    pub feed_url: &'a str,
    pub color_tag: Option<&'a str>,
    pub enabled: bool,
}
