//! Availability merging and conflict detection.
//!
//! The merger is pure: the same bookings and busy intervals always
//! produce the same occupied ranges and the same conflicts, which makes
//! cycles idempotent and deterministic to test.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use guidepost_core::types::BusyInterval;

/// Where an occupied range originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source_id", rename_all = "snake_case")]
pub enum Origin {
    /// The internal booking ledger.
    Ledger,
    /// An external calendar source.
    Source(Uuid),
}

/// One occupied time range in the canonical availability view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupiedRange {
    pub origin: Origin,
    /// Booking id for ledger ranges, event UID for source ranges.
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: Option<String>,
}

/// Two occupying ranges that overlap in time.
///
/// Conflicts are derived data: recomputed each cycle, surfaced for human
/// or policy resolution, never auto-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub first: OccupiedRange,
    pub second: OccupiedRange,
    pub detected_at: DateTime<Utc>,
}

/// Result of merging the ledger with all sources' busy intervals.
#[derive(Debug, Clone, Serialize)]
pub struct MergedAvailability {
    /// All occupied ranges, sorted by start, end, then uid.
    pub occupied: Vec<OccupiedRange>,
    /// Overlaps between ranges of different origins.
    pub conflicts: Vec<Conflict>,
    /// Overlaps between two ledger bookings. Reported separately: only
    /// the ledger owner can resolve these.
    pub ledger_overlaps: Vec<Conflict>,
}

/// ## Summary
/// Merges ledger ranges and imported busy intervals into one canonical
/// occupied view and detects overlapping-range conflicts.
///
/// Overlap uses half-open semantics: `[s1,e1)` and `[s2,e2)` conflict iff
/// `s1 < e2 && s2 < e1`, so back-to-back ranges never conflict. Overlaps
/// within a single external source are that source's own affair and are
/// not reported.
#[must_use]
pub fn merge(
    ledger: &[OccupiedRange],
    busy: &[BusyInterval],
    detected_at: DateTime<Utc>,
) -> MergedAvailability {
    let mut occupied: Vec<OccupiedRange> = Vec::with_capacity(ledger.len() + busy.len());
    occupied.extend_from_slice(ledger);
    occupied.extend(busy.iter().map(|interval| OccupiedRange {
        origin: Origin::Source(interval.source_id),
        uid: interval.external_uid.clone(),
        start: interval.start,
        end: interval.end,
        label: interval.label.clone(),
    }));

    occupied.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then_with(|| a.uid.cmp(&b.uid))
    });

    let mut conflicts = Vec::new();
    let mut ledger_overlaps = Vec::new();

    for (i, range) in occupied.iter().enumerate() {
        for candidate in &occupied[i + 1..] {
            // Sorted by start: once a candidate begins at or after this
            // range's end, no later candidate can overlap it.
            if candidate.start >= range.end {
                break;
            }
            if range.start >= candidate.end {
                continue;
            }

            match (range.origin, candidate.origin) {
                (Origin::Ledger, Origin::Ledger) => ledger_overlaps.push(Conflict {
                    first: range.clone(),
                    second: candidate.clone(),
                    detected_at,
                }),
                (a, b) if a == b => {}
                _ => conflicts.push(Conflict {
                    first: range.clone(),
                    second: candidate.clone(),
                    detected_at,
                }),
            }
        }
    }

    MergedAvailability {
        occupied,
        conflicts,
        ledger_overlaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 5, hour, minute, 0)
            .single()
            .unwrap()
    }

    fn ledger_range(uid: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> OccupiedRange {
        OccupiedRange {
            origin: Origin::Ledger,
            uid: uid.to_string(),
            start,
            end,
            label: None,
        }
    }

    fn busy(source_id: Uuid, uid: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> BusyInterval {
        BusyInterval {
            source_id,
            external_uid: uid.to_string(),
            start,
            end,
            label: None,
        }
    }

    #[test]
    fn overlapping_cross_origin_ranges_conflict_once() {
        let source = Uuid::new_v4();
        let merged = merge(
            &[ledger_range("b-1", at(10, 0), at(12, 0))],
            &[busy(source, "ev-1", at(11, 0), at(13, 0))],
            at(15, 0),
        );

        assert_eq!(merged.conflicts.len(), 1);
        assert!(merged.ledger_overlaps.is_empty());
        let conflict = &merged.conflicts[0];
        assert_eq!(conflict.first.origin, Origin::Ledger);
        assert_eq!(conflict.second.origin, Origin::Source(source));
    }

    #[test]
    fn back_to_back_ranges_do_not_conflict() {
        let merged = merge(
            &[ledger_range("b-1", at(10, 0), at(12, 0))],
            &[busy(Uuid::new_v4(), "ev-1", at(12, 0), at(14, 0))],
            at(15, 0),
        );

        assert!(merged.conflicts.is_empty());
        assert!(merged.ledger_overlaps.is_empty());
        assert_eq!(merged.occupied.len(), 2);
    }

    #[test]
    fn ledger_overlaps_reported_separately() {
        let merged = merge(
            &[
                ledger_range("b-1", at(10, 0), at(12, 0)),
                ledger_range("b-2", at(11, 0), at(13, 0)),
            ],
            &[],
            at(15, 0),
        );

        assert!(merged.conflicts.is_empty());
        assert_eq!(merged.ledger_overlaps.len(), 1);
    }

    #[test]
    fn same_source_overlaps_are_ignored() {
        let source = Uuid::new_v4();
        let merged = merge(
            &[],
            &[
                busy(source, "ev-1", at(10, 0), at(12, 0)),
                busy(source, "ev-2", at(11, 0), at(13, 0)),
            ],
            at(15, 0),
        );

        assert!(merged.conflicts.is_empty());
        assert!(merged.ledger_overlaps.is_empty());
    }

    #[test]
    fn distinct_sources_conflict_with_each_other() {
        let merged = merge(
            &[],
            &[
                busy(Uuid::new_v4(), "ev-1", at(10, 0), at(12, 0)),
                busy(Uuid::new_v4(), "ev-2", at(11, 0), at(13, 0)),
            ],
            at(15, 0),
        );

        assert_eq!(merged.conflicts.len(), 1);
    }

    #[test]
    fn merge_is_deterministic() {
        let source_a = Uuid::new_v4();
        let source_b = Uuid::new_v4();
        let ledger = vec![
            ledger_range("b-1", at(9, 0), at(10, 30)),
            ledger_range("b-2", at(11, 0), at(12, 0)),
        ];
        let intervals = vec![
            busy(source_a, "ev-1", at(10, 0), at(11, 30)),
            busy(source_b, "ev-2", at(11, 15), at(12, 45)),
        ];

        let first = merge(&ledger, &intervals, at(15, 0));
        let second = merge(&ledger, &intervals, at(15, 0));

        assert_eq!(first.occupied, second.occupied);
        assert_eq!(first.conflicts, second.conflicts);
        assert_eq!(first.ledger_overlaps, second.ledger_overlaps);
    }

    #[test]
    fn every_conflict_carries_both_ranges() {
        let source = Uuid::new_v4();
        let merged = merge(
            &[ledger_range("b-1", at(10, 0), at(12, 0))],
            &[busy(source, "ev-1", at(11, 0), at(13, 0))],
            at(15, 0),
        );

        let conflict = &merged.conflicts[0];
        assert_eq!(conflict.first.uid, "b-1");
        assert_eq!(conflict.second.uid, "ev-1");
        assert_eq!(conflict.detected_at, at(15, 0));
    }
}
