//! Sanitization of externally sourced text.
//!
//! Page titles and WHOIS values end up in stored snapshots and JSON
//! responses. Control characters are dropped and whitespace runs (including
//! newlines inside `<title>`) collapse to a single space.

/// Removes control characters and collapses whitespace.
pub fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
