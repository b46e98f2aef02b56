//! Webspace: an Apache virtual host served from a directory.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webspace {
    pub domain: String,
    pub path: String,
}

impl Webspace {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when `domain` or `path` is blank.
    pub fn new(domain: &str, path: &str) -> Result<Self, ValidationError> {
        let domain = domain.trim();
        let path = path.trim();
        if domain.is_empty() {
            return Err(ValidationError::EmptyField("domain"));
        }
        if path.is_empty() {
            return Err(ValidationError::EmptyField("path"));
        }
        Ok(Self {
            domain: domain.to_string(),
            path: path.to_string(),
        })
    }
}
