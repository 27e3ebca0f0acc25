//! Content line lexer for iCalendar (RFC 5545 §3.1).
//!
//! Handles line unfolding and tokenization of content lines.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::core::{ContentLine, Parameter};

/// Splits input into content lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. Per RFC 5545 §3.1 a line
/// starting with SPACE or HTAB continues the previous line; unfolding
/// removes the line break and the single whitespace character.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(continuation);
            } else {
                lines.push((i + 1, continuation.to_string()));
            }
        } else {
            lines.push((i + 1, line.to_string()));
        }
    }

    lines
}

/// Parses a single content line.
///
/// Format: `name *(";" param) ":" value`
///
/// ## Errors
/// Returns an error if the line is malformed.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let mut rest = line;

    // Property name runs up to the first ';' or ':'.
    let name_end = rest
        .find([';', ':'])
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingColon, line_num))?;
    if name_end == 0 {
        return Err(ParseError::new(
            ParseErrorKind::MissingPropertyName,
            line_num,
        ));
    }

    let name = &rest[..name_end];
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ParseError::new(ParseErrorKind::InvalidPropertyName, line_num)
            .with_context(name.to_string()));
    }
    let name = name.to_ascii_uppercase();

    let mut params = Vec::new();
    rest = &rest[name_end..];

    // Zero or more ';'-prefixed parameters, then ':'.
    while let Some(after) = rest.strip_prefix(';') {
        let (param, remaining) = parse_parameter(after, line_num)?;
        params.push(param);
        rest = remaining;
    }

    let value = rest
        .strip_prefix(':')
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingColon, line_num))?;

    Ok(ContentLine {
        name,
        params,
        raw_value: value.to_string(),
    })
}

/// Parses one parameter (`NAME=value *("," value)`) and returns the rest of
/// the line, which starts with `;` or `:`.
fn parse_parameter(input: &str, line_num: usize) -> ParseResult<(Parameter, &str)> {
    let eq = input
        .find('=')
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidParameter, line_num))?;
    let name = &input[..eq];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ParseError::new(ParseErrorKind::InvalidParameter, line_num)
            .with_context(name.to_string()));
    }

    let mut rest = &input[eq + 1..];
    let mut values = Vec::new();

    loop {
        let (value, remaining) = parse_param_value(rest, line_num)?;
        values.push(value);
        rest = remaining;

        match rest.chars().next() {
            Some(',') => rest = &rest[1..],
            Some(';' | ':') => break,
            Some(c) => {
                return Err(ParseError::new(ParseErrorKind::InvalidParameter, line_num)
                    .with_context(format!("unexpected character '{c}'")));
            }
            None => return Err(ParseError::new(ParseErrorKind::MissingColon, line_num)),
        }
    }

    Ok((Parameter::with_values(name, values), rest))
}

/// Parses a single parameter value, which may be quoted.
fn parse_param_value(input: &str, line_num: usize) -> ParseResult<(String, &str)> {
    if let Some(quoted) = input.strip_prefix('"') {
        let end = quoted
            .find('"')
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnclosedQuote, line_num))?;
        return Ok((quoted[..end].to_string(), &quoted[end + 1..]));
    }

    // Unquoted values run until ',' ';' or ':'.
    let end = input.find([',', ';', ':']).unwrap_or(input.len());
    Ok((input[..end].to_string(), &input[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_unfolds_continuations() {
        let input = "DESCRIPTION:This is a long description\r\n that continues here\r\nUID:x";
        let lines = split_lines(input);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].1, "DESCRIPTION:This is a long descriptionthat continues here");
    }

    #[test]
    fn split_lines_handles_bare_lf() {
        let lines = split_lines("SUMMARY:First\n Second\nUID:y");
        assert_eq!(lines[0].1, "SUMMARY:FirstSecond");
        assert_eq!(lines[1], (3, "UID:y".to_string()));
    }

    #[test]
    fn parse_simple_line() {
        let result = parse_content_line("SUMMARY:Harbour tour", 1).unwrap();
        assert_eq!(result.name, "SUMMARY");
        assert!(result.params.is_empty());
        assert_eq!(result.raw_value, "Harbour tour");
    }

    #[test]
    fn parse_line_with_params() {
        let result = parse_content_line("DTSTART;TZID=Europe/Berlin:20260805T100000", 1).unwrap();
        assert_eq!(result.name, "DTSTART");
        assert_eq!(result.params.len(), 1);
        assert_eq!(result.params[0].name, "TZID");
        assert_eq!(result.params[0].value(), Some("Europe/Berlin"));
        assert_eq!(result.raw_value, "20260805T100000");
    }

    #[test]
    fn parse_line_with_quoted_param() {
        let result =
            parse_content_line("ATTENDEE;CN=\"Doe, Jane\":mailto:jane@example.com", 1).unwrap();
        assert_eq!(result.params[0].value(), Some("Doe, Jane"));
        assert_eq!(result.raw_value, "mailto:jane@example.com");
    }

    #[test]
    fn parse_line_with_multiple_param_values() {
        let result = parse_content_line("X-TAGS;KIND=walking,boat:yes", 1).unwrap();
        assert_eq!(result.params[0].values, vec!["walking", "boat"]);
    }

    #[test]
    fn parse_line_unclosed_quote() {
        let err = parse_content_line("ATTENDEE;CN=\"Unclosed:mailto:x@example.com", 1).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedQuote);
    }

    #[test]
    fn parse_line_missing_colon() {
        let err = parse_content_line("INVALID", 3).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingColon);
        assert_eq!(err.line, 3);
    }
}
