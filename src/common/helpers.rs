// Helper functions for safe logging and timestamp handling

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Storage format for every timestamp column.
/// Fixed width so lexical order matches chronological order, and readable by SQLite's
/// date functions.
pub const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            format!("{}***@{}", &parts[0][..1.min(parts[0].len())], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks identity subjects for safe logging
/// Shows only first and last 4 characters
pub fn safe_identity_log(identity: &str) -> String {
    if identity.len() > 8 && identity.is_ascii() {
        format!("{}...{}", &identity[..4], &identity[identity.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Format a UTC instant the way it is stored in the database
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(DB_TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp back into a UTC instant
///
/// Accepts the storage format (with or without milliseconds) and RFC 3339.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
