//! Database enum types with Diesel serialization.
//!
//! Type-safe wrappers for the booking CHECK constraints. Each enum
//! implements `ToSql` and `FromSql` for automatic conversion between Rust
//! and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

/// Booking lifecycle status.
///
/// Maps to `booking.status` CHECK constraint. The legal transitions are
/// `pending→confirmed`, `confirmed→in_progress`, `in_progress→completed`,
/// and `pending|confirmed→cancelled`; `completed` and `cancelled` are
/// terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that occupy a slot for conflict detection and export.
    pub const OCCUPYING: [Self; 2] = [Self::Confirmed, Self::InProgress];

    /// Returns the database string representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its database string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns whether this status removes a slot from availability.
    #[must_use]
    pub const fn is_occupying(self) -> bool {
        matches!(self, Self::Confirmed | Self::InProgress)
    }

    /// Returns whether the status machine permits `self → next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
        )
    }
}

impl ToSql<Text, Pg> for BookingStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for BookingStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"pending" => Ok(Self::Pending),
            b"confirmed" => Ok(Self::Confirmed),
            b"in_progress" => Ok(Self::InProgress),
            b"completed" => Ok(Self::Completed),
            b"cancelled" => Ok(Self::Cancelled),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking origin channel.
///
/// Maps to `booking.channel` CHECK constraint. `(channel,
/// external_reference)` is the idempotency key for webhook ingestion.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum BookingChannel {
    /// Created by an operator; carries no external reference.
    Direct,
    /// The supplier API partner (nested webhook payload).
    Partner,
    /// Agency resellers (flat webhook payload).
    Agency,
}

impl BookingChannel {
    /// Returns the database string representation of this channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Partner => "partner",
            Self::Agency => "agency",
        }
    }

    /// Parses a channel from its database string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(Self::Direct),
            "partner" => Some(Self::Partner),
            "agency" => Some(Self::Agency),
            _ => None,
        }
    }
}

impl ToSql<Text, Pg> for BookingChannel {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for BookingChannel {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"direct" => Ok(Self::Direct),
            b"partner" => Ok(Self::Partner),
            b"agency" => Ok(Self::Agency),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl fmt::Display for BookingChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_accepted() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::InProgress));
        assert!(BookingStatus::InProgress.can_transition_to(BookingStatus::Completed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn terminal_statuses_reject_transitions() {
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn backwards_transitions_rejected() {
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::InProgress.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::InProgress.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn occupying_statuses() {
        assert!(BookingStatus::Confirmed.is_occupying());
        assert!(BookingStatus::InProgress.is_occupying());
        assert!(!BookingStatus::Pending.is_occupying());
        assert!(!BookingStatus::Completed.is_occupying());
        assert!(!BookingStatus::Cancelled.is_occupying());
    }

    #[test_log::test]
    fn string_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        for channel in [
            BookingChannel::Direct,
            BookingChannel::Partner,
            BookingChannel::Agency,
        ] {
            assert_eq!(BookingChannel::parse(channel.as_str()), Some(channel));
        }
    }
}
