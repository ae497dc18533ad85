//! Timestamp display helpers.

use chrono::DateTime;

/// Display pattern matching "Jul 05, 2025, 11:30 AM".
const TIMESTAMP_FORMAT: &str = "%b %d, %Y, %I:%M %p";

/// Format an ISO-8601/RFC-3339 timestamp for table display.
///
/// Absent, empty and unparseable input all render as the `-` placeholder,
/// so a half-filled record never leaks raw server text into the table.
pub fn display_timestamp(iso: Option<&str>) -> String {
    let Some(raw) = iso else {
        return "-".to_string();
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return "-".to_string();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rfc3339_timestamp() {
        assert_eq!(
            display_timestamp(Some("2025-07-05T11:30:00Z")),
            "Jul 05, 2025, 11:30 AM"
        );
    }

    #[test]
    fn formats_afternoon_with_offset() {
        assert_eq!(
            display_timestamp(Some("2025-12-31T18:05:00+01:00")),
            "Dec 31, 2025, 06:05 PM"
        );
    }

    #[test]
    fn missing_and_empty_render_placeholder() {
        assert_eq!(display_timestamp(None), "-");
        assert_eq!(display_timestamp(Some("")), "-");
        assert_eq!(display_timestamp(Some("   ")), "-");
    }

    #[test]
    fn unparseable_renders_placeholder() {
        assert_eq!(display_timestamp(Some("yesterday")), "-");
        assert_eq!(display_timestamp(Some("2025-13-40T99:00:00Z")), "-");
    }
}
