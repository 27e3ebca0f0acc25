//! iCalendar document parser (RFC 5545).
//!
//! Builds a component tree from BEGIN/END-delimited content lines.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{parse_content_line, split_lines};
use crate::core::{Component, ComponentKind, ICalendar, Property};

/// Parses an iCalendar document from a string.
///
/// ## Errors
///
/// Returns an error if the input is not a well-formed VCALENDAR document.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<ICalendar> {
    let lines = split_lines(input);

    if lines.is_empty() {
        tracing::warn!("Empty iCalendar input");
        return Err(ParseError::new(ParseErrorKind::MissingBegin, 1));
    }

    let mut stack: Vec<Component> = Vec::new();
    let mut root: Option<Component> = None;

    for (line_num, line) in lines {
        let content_line = parse_content_line(&line, line_num)?;

        match content_line.name.as_str() {
            "BEGIN" => {
                stack.push(Component::named(content_line.raw_value.to_ascii_uppercase()));
            }
            "END" => {
                let end_name = content_line.raw_value.to_ascii_uppercase();
                let Some(finished) = stack.pop() else {
                    return Err(ParseError::new(ParseErrorKind::MismatchedComponent, line_num)
                        .with_context(format!("END:{end_name} without matching BEGIN")));
                };
                if finished.name != end_name {
                    return Err(ParseError::new(ParseErrorKind::MismatchedComponent, line_num)
                        .with_context(format!(
                            "expected END:{}, got END:{end_name}",
                            finished.name
                        )));
                }

                match stack.last_mut() {
                    Some(parent) => parent.children.push(finished),
                    None => {
                        if root.is_some() {
                            return Err(ParseError::new(
                                ParseErrorKind::MismatchedComponent,
                                line_num,
                            )
                            .with_context("multiple top-level components"));
                        }
                        root = Some(finished);
                    }
                }
            }
            _ => {
                let Some(current) = stack.last_mut() else {
                    return Err(ParseError::new(ParseErrorKind::MissingBegin, line_num)
                        .with_context("property outside of any component"));
                };
                current.properties.push(Property::from(content_line));
            }
        }
    }

    if let Some(unterminated) = stack.last() {
        return Err(ParseError::new(ParseErrorKind::MissingEnd, 0)
            .with_context(format!("missing END:{}", unterminated.name)));
    }

    let root = root.ok_or_else(|| ParseError::new(ParseErrorKind::MissingBegin, 1))?;
    if root.kind != ComponentKind::Calendar {
        return Err(
            ParseError::new(ParseErrorKind::MissingBegin, 1).with_context("expected VCALENDAR")
        );
    }

    tracing::debug!(events = root.events().len(), "iCalendar document parsed");

    Ok(ICalendar { root })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//EN\r\nBEGIN:VEVENT\r\nUID:ev-1\r\nDTSTART:20260805T100000Z\r\nDTEND:20260805T120000Z\r\nSUMMARY:Harbour tour\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

    #[test]
    fn parses_minimal_document() {
        let ical = parse(MINIMAL).unwrap();
        assert_eq!(ical.version(), Some("2.0"));
        assert_eq!(ical.events().len(), 1);
        assert_eq!(ical.events()[0].uid(), Some("ev-1"));
    }

    #[test]
    fn parses_nested_alarm() {
        let input = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:ev-2\r\nBEGIN:VALARM\r\nACTION:DISPLAY\r\nEND:VALARM\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let ical = parse(input).unwrap();
        assert_eq!(ical.events()[0].children.len(), 1);
        assert_eq!(ical.events()[0].children[0].kind, ComponentKind::Alarm);
    }

    #[test]
    fn rejects_missing_end() {
        let input = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:ev-3\r\nEND:VCALENDAR\r\n";
        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MismatchedComponent);
    }

    #[test]
    fn rejects_unterminated_document() {
        let err = parse("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingEnd);
    }

    #[test]
    fn rejects_non_calendar_root() {
        let err = parse("BEGIN:VEVENT\r\nUID:ev-4\r\nEND:VEVENT\r\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingBegin);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse("").is_err());
    }
}
