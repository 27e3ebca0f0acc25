//! Guidepost service layer: the availability synchronization core.
//!
//! Everything here is driven either by the sync orchestrator (feed import,
//! merge, partner push) or by the HTTP surface (webhook ingest, feed
//! export); the booking ledger in `guidepost-db` stays authoritative.

pub mod error;
pub mod events;
pub mod feed;
pub mod ingest;
pub mod ledger;
pub mod partner;
pub mod sync;
