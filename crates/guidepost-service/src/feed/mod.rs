//! Calendar feed adapters: inbound import and outbound generation.

pub mod export;
pub mod import;
