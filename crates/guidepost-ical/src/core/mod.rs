//! Core iCalendar models (RFC 5545).
//!
//! These types keep the original property order so that repeated
//! serialization of the same document is byte-stable.

mod component;
mod property;

pub use self::component::{Component, ComponentKind, ICalendar};
pub use self::property::{ContentLine, Parameter, Property};
