//! Document serialization.
//!
//! Properties are written in insertion order, so serializing the same
//! document twice yields identical bytes.

use super::escape::escape_param_value;
use super::fold::fold_line;
use crate::core::{Component, ICalendar, Property};

/// Serializes a full iCalendar document.
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    let mut out = String::new();
    serialize_component(&ical.root, &mut out);
    out
}

/// Serializes one component (and its children) into `out`.
pub fn serialize_component(component: &Component, out: &mut String) {
    push_line(out, &format!("BEGIN:{}", component.name));

    for property in &component.properties {
        push_line(out, &serialize_property(property));
    }
    for child in &component.children {
        serialize_component(child, out);
    }

    push_line(out, &format!("END:{}", component.name));
}

/// Renders one property as an unfolded content line.
#[must_use]
pub fn serialize_property(property: &Property) -> String {
    let mut line = property.name.clone();

    for param in &property.params {
        line.push(';');
        line.push_str(&param.name);
        line.push('=');
        let rendered: Vec<String> = param.values.iter().map(|v| escape_param_value(v)).collect();
        line.push_str(&rendered.join(","));
    }

    line.push(':');
    line.push_str(&property.value);
    line
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold_line(line));
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parameter;

    #[test]
    fn property_with_params() {
        let prop = Property::raw("DTSTART", "20260805T100000")
            .with_param(Parameter::new("TZID", "Europe/Berlin"));
        assert_eq!(
            serialize_property(&prop),
            "DTSTART;TZID=Europe/Berlin:20260805T100000"
        );
    }

    #[test]
    fn document_uses_crlf_line_endings() {
        let ical = ICalendar::new("-//Test//Test//EN");
        let text = serialize(&ical);
        assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(text.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn serialization_is_deterministic() {
        let mut ical = ICalendar::new("-//Test//Test//EN");
        let mut event = Component::event();
        event.add_property(Property::text("UID", "ev-1"));
        event.add_property(Property::text("SUMMARY", "Harbour tour"));
        ical.add_event(event);

        assert_eq!(serialize(&ical), serialize(&ical));
    }
}
