//! Outbound feed generation.
//!
//! External partners treat everything in this feed as occupied, so only
//! `confirmed` and `in_progress` bookings may appear; excluding `pending`
//! and `cancelled` is a correctness invariant, not presentation.

use chrono::Duration;
use sha2::{Digest, Sha256};

use guidepost_core::constants::FEED_PRODID;
use guidepost_db::model::booking::Booking;
use guidepost_ical::build;
use guidepost_ical::core::{Component, ICalendar, Property};

/// ## Summary
/// Builds the outbound calendar document from the current ledger state.
///
/// Every event's `UID` is the booking id and its `DTSTAMP` is the
/// booking's `updated_at`, so regenerating an unchanged ledger yields an
/// identical, diffable document.
#[must_use]
pub fn build_feed(bookings: &[Booking], default_duration: Duration) -> ICalendar {
    let mut ical = ICalendar::new(FEED_PRODID);

    for booking in bookings.iter().filter(|b| b.status.is_occupying()) {
        let mut event = Component::event();
        event.add_property(Property::text("UID", booking.id.to_string()));
        event.add_property(Property::datetime_utc("DTSTAMP", booking.updated_at));
        event.add_property(Property::datetime_utc("DTSTART", booking.starts_at()));
        event.add_property(Property::datetime_utc(
            "DTEND",
            booking.ends_at(default_duration),
        ));
        event.add_property(Property::text(
            "SUMMARY",
            format!("Guided tour ({} guests)", booking.number_of_people),
        ));
        event.add_property(Property::text(
            "DESCRIPTION",
            format!("Channel: {}", booking.channel),
        ));
        ical.add_event(event);
    }

    ical
}

/// ## Summary
/// Serializes the outbound feed for the given bookings.
#[must_use]
pub fn serialize_feed(bookings: &[Booking], default_duration: Duration) -> String {
    build::serialize(&build_feed(bookings, default_duration))
}

/// ## Summary
/// Generates a strong `ETag` for a serialized feed: the hex-encoded
/// SHA256 of the content, wrapped in quotes.
#[must_use]
pub fn feed_etag(feed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(feed.as_bytes());
    let hash = hasher.finalize();
    format!("\"{}\"", hex::encode(hash))
}
