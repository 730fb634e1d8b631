//! Ticket reference extraction.

use regex::Regex;
use std::sync::OnceLock;

fn ticket_re() -> &'static Regex {
    static TICKET_RE: OnceLock<Regex> = OnceLock::new();
    TICKET_RE.get_or_init(|| Regex::new(r"#(\d+)").expect("ticket pattern is valid"))
}

/// Extract a ticket id from free-form title text.
///
/// A reference is `#` immediately followed by decimal digits, anywhere in
/// the string; the leftmost occurrence wins. Returns `None` when the title
/// carries no reference; that is an expected outcome, not an error.
pub fn parse_ticket_ref(title: &str) -> Option<i64> {
    ticket_re()
        .captures(title)
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_in_middle_of_title() {
        assert_eq!(parse_ticket_ref("Fix login #482 issue"), Some(482));
    }

    #[test]
    fn test_no_reference() {
        assert_eq!(parse_ticket_ref("No ticket here"), None);
        assert_eq!(parse_ticket_ref(""), None);
        // A bare hash without digits is not a reference.
        assert_eq!(parse_ticket_ref("see issue # 12"), None);
    }

    #[test]
    fn test_leftmost_reference_wins() {
        assert_eq!(parse_ticket_ref("#17 and #99"), Some(17));
    }

    #[test]
    fn test_reference_at_end() {
        assert_eq!(parse_ticket_ref("Hotfix for #7"), Some(7));
    }
}
