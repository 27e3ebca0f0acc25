//! Value escaping (RFC 5545 §3.3.11).

/// Escapes a TEXT value: backslash, semicolon, comma, and newline.
#[must_use]
pub fn escape_text(input: &str) -> String {
    let mut result = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' => result.push_str("\\,"),
            '\n' => result.push_str("\\n"),
            '\r' => {}
            _ => result.push(c),
        }
    }

    result
}

/// Renders a parameter value, quoting when it contains `:` `;` or `,`.
///
/// Double quotes are not representable inside quoted values (RFC 5545
/// §3.1) and are dropped.
#[must_use]
pub fn escape_param_value(value: &str) -> String {
    let cleaned: String = value.chars().filter(|&c| c != '"').collect();

    if cleaned.contains([':', ';', ',']) {
        format!("\"{cleaned}\"")
    } else {
        cleaned
    }
}
