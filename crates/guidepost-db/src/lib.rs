//! The Guidepost booking ledger: Postgres schema, models, and queries.

pub mod db;
pub mod error;
pub mod model;
