use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One busy time range reported by an external calendar source.
///
/// Busy intervals are recomputed on every sync cycle and never persisted;
/// the feed they came from remains the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    /// Source the interval was imported from.
    pub source_id: Uuid,
    /// Event UID as published by the source feed.
    pub external_uid: String,
    /// Inclusive start of the busy range.
    pub start: DateTime<Utc>,
    /// Exclusive end of the busy range.
    pub end: DateTime<Utc>,
    /// Human-readable event summary, if the feed carried one.
    pub label: Option<String>,
}

impl BusyInterval {
    /// Returns whether this interval overlaps `[start, end)`.
    ///
    /// Half-open semantics: back-to-back ranges do not overlap.
    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}
