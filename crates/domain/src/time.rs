//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for session creation, DNS entries, game servers, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a backend timestamp.
///
/// The backend emits naive ISO-8601 local times (`2024-05-01T12:00:00.123456`)
/// as well as RFC 3339. Naive values are interpreted as UTC.
#[must_use]
pub fn parse_backend_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_parse_naive_backend_timestamp() {
        let ts = parse_backend_timestamp("2024-05-01T12:30:00.123456").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T12:30:00.123456+00:00");
    }

    #[test]
    fn should_parse_rfc3339_timestamp() {
        let ts = parse_backend_timestamp("2024-05-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T10:30:00+00:00");
    }

    #[test]
    fn should_return_none_for_garbage() {
        assert!(parse_backend_timestamp("yesterday").is_none());
    }
}
