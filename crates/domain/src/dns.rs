//! DNS: local name records served by the home server.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{Timestamp, parse_backend_timestamp};

/// A local DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsEntry {
    pub domain: String,
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

impl DnsEntry {
    /// Build a new record from user input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when `domain` or `ip` is blank.
    pub fn new(domain: &str, ip: &str) -> Result<Self, ValidationError> {
        let domain = domain.trim();
        let ip = ip.trim();
        if domain.is_empty() {
            return Err(ValidationError::EmptyField("domain"));
        }
        if ip.is_empty() {
            return Err(ValidationError::EmptyField("ip"));
        }
        Ok(Self {
            domain: domain.to_string(),
            ip: ip.to_string(),
            created: None,
        })
    }

    #[must_use]
    pub fn created_at(&self) -> Option<Timestamp> {
        self.created.as_deref().and_then(parse_backend_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_trimmed_entry() {
        let entry = DnsEntry::new(" nas.home ", "192.168.0.10").unwrap();
        assert_eq!(entry.domain, "nas.home");
        assert!(entry.created.is_none());
    }

    #[test]
    fn should_reject_missing_ip() {
        assert_eq!(
            DnsEntry::new("nas.home", " "),
            Err(ValidationError::EmptyField("ip"))
        );
    }

    #[test]
    fn should_parse_created_timestamp() {
        let entry: DnsEntry = serde_json::from_str(
            r#"{"domain":"a","ip":"1.2.3.4","created":"2024-01-02T03:04:05.000001"}"#,
        )
        .unwrap();
        assert!(entry.created_at().is_some());
    }
}
