//! NULL-marker cleanup for exported CSV
//!
//! The database's CSV export writes NULL column values as a `"N` marker,
//! which the warehouse cannot parse. Two rewrites fix a line:
//! `"N,` becomes `,` anywhere, and a trailing `,"N` before the newline
//! becomes a bare `,`. Everything else, including other embedded quote
//! characters, passes through untouched.

/// Clean a whole text, preserving line structure
///
/// Lines keep their terminators; a final line without a newline never
/// matches the trailing rule, same as the line-by-line original.
pub fn clean_csv(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for line in input.split_inclusive('\n') {
        output.push_str(&clean_csv_line(line));
    }
    output
}

/// Clean one line, including its terminator if present
pub fn clean_csv_line(line: &str) -> String {
    let cleaned = line.replace("\"N,", ",");
    match cleaned.strip_suffix(",\"N\n") {
        Some(head) => {
            let mut rebuilt = String::with_capacity(head.len() + 2);
            rebuilt.push_str(head);
            rebuilt.push_str(",\n");
            rebuilt
        }
        None => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_null_marker_rewritten() {
        assert_eq!(clean_csv_line("1,\"N,3\n"), "1,,3\n");
    }

    #[test]
    fn test_trailing_null_marker_rewritten() {
        assert_eq!(clean_csv_line("1,2,\"N\n"), "1,2,\n");
    }

    #[test]
    fn test_mixed_markers_leave_other_quotes_alone() {
        // Inner marker rewritten; what remains at the tail is not a
        // `,"N` sequence, so the embedded quote survives.
        assert_eq!(clean_csv_line("1,\"N,3\"N\n"), "1,,3\"N\n");
    }

    #[test]
    fn test_line_without_markers_is_identity() {
        let line = "42,\"quoted, field\",plain\n";
        assert_eq!(clean_csv_line(line), line);
    }

    #[test]
    fn test_final_line_without_newline_keeps_trailing_marker() {
        // No newline, so the trailing rule cannot match.
        assert_eq!(clean_csv_line("1,2,\"N"), "1,2,\"N");
    }

    #[test]
    fn test_clean_csv_multi_line() {
        let input = "a,\"N,c\n1,2,\"N\nplain,row\n";
        assert_eq!(clean_csv(input), "a,,c\n1,2,\nplain,row\n");
    }

    #[test]
    fn test_clean_csv_round_trip_identity() {
        let input = "x,y,z\n1,2,3\n";
        assert_eq!(clean_csv(input), input);
    }
}
