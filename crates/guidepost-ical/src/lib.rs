//! Minimal iCalendar (RFC 5545) support for Guidepost.
//!
//! Covers the subset the availability engine needs: content-line lexing
//! with unfolding and parameters, VCALENDAR/VEVENT component parsing,
//! DATE / DATE-TIME / DURATION value parsing into `chrono` types, and a
//! deterministic serializer with escaping and 75-octet folding.

pub mod build;
pub mod core;
pub mod error;
pub mod parse;

#[cfg(test)]
mod tests;
