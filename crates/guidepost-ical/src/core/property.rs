//! Properties, parameters, and content lines (RFC 5545 §3.1–3.2).

use crate::build::escape_text;
use crate::parse::unescape_text;

/// A property parameter (RFC 5545 §3.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name, uppercased.
    pub name: String,
    /// One or more parameter values.
    pub values: Vec<String>,
}

impl Parameter {
    /// Creates a single-valued parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_values(name, vec![value.into()])
    }

    /// Creates a parameter with multiple values.
    #[must_use]
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// A tokenized content line, before property interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name, uppercased.
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Everything after the colon, unmodified.
    pub raw_value: String,
}

/// A property attached to a component.
///
/// The `value` field holds the wire form: text values stay escaped until
/// read through [`Property::text_value`], so parse → serialize round-trips
/// do not re-escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name, uppercased.
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Wire-form value.
    pub value: String,
}

impl Property {
    /// Creates a TEXT property, escaping the value for the wire.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl AsRef<str>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: escape_text(value.as_ref()),
        }
    }

    /// Creates a property from an already wire-formatted value
    /// (dates, durations, integers).
    #[must_use]
    pub fn raw(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    /// Creates a DATE-TIME property in UTC form (`YYYYMMDDTHHMMSSZ`).
    #[must_use]
    pub fn datetime_utc(name: impl Into<String>, value: chrono::DateTime<chrono::Utc>) -> Self {
        Self::raw(name, value.format("%Y%m%dT%H%M%SZ").to_string())
    }

    /// Attaches a parameter, builder-style.
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Returns the first value of the named parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        let name_upper = name.to_ascii_uppercase();
        self.params
            .iter()
            .find(|p| p.name == name_upper)
            .and_then(Parameter::value)
    }

    /// Returns the value with TEXT escapes resolved.
    #[must_use]
    pub fn text_value(&self) -> String {
        unescape_text(&self.value)
    }
}

impl From<ContentLine> for Property {
    fn from(line: ContentLine) -> Self {
        Self {
            name: line.name,
            params: line.params,
            value: line.raw_value,
        }
    }
}
