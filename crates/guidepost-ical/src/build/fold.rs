//! Content line folding (RFC 5545 §3.1).

/// Folds a content line at 75 octets, breaking only at UTF-8 boundaries.
///
/// Continuation lines start with a single space, which counts toward
/// their own 75 octets.
#[must_use]
pub fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;

    if line.len() <= LIMIT {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + (line.len() / LIMIT) * 3);
    let mut segment_max = LIMIT;
    let mut used = 0;

    for c in line.chars() {
        let width = c.len_utf8();
        if used + width > segment_max {
            result.push_str("\r\n ");
            used = 0;
            segment_max = LIMIT - 1;
        }
        result.push(c);
        used += width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_untouched() {
        assert_eq!(fold_line("SUMMARY:Harbour tour"), "SUMMARY:Harbour tour");
    }

    #[test]
    fn long_line_folds_at_75_octets() {
        let line = format!("DESCRIPTION:{}", "x".repeat(100));
        let folded = fold_line(&line);

        for segment in folded.split("\r\n") {
            assert!(segment.len() <= 75, "segment too long: {}", segment.len());
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn folding_respects_utf8_boundaries() {
        let line = format!("DESCRIPTION:{}", "ü".repeat(80));
        let folded = fold_line(&line);

        for segment in folded.split("\r\n") {
            assert!(segment.len() <= 75);
        }
        // Reassembling must yield the original line intact.
        assert_eq!(folded.replace("\r\n ", ""), line);
    }
}
