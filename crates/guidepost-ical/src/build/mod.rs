//! iCalendar serialization (RFC 5545).
//!
//! - Escape: text and parameter value escaping
//! - Fold: content line folding at 75 octets
//! - Serializer: full document serialization in insertion order

mod escape;
mod fold;
mod serializer;

pub use self::escape::{escape_param_value, escape_text};
pub use self::fold::fold_line;
pub use self::serializer::{serialize, serialize_component, serialize_property};
