//! Typed identifier newtypes for backend-issued handles.
//!
//! The backend owns these ids; the client treats them as opaque strings
//! and never derives meaning from their contents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident, $label:literal) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend-issued identifier.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyField`] when `raw` is blank.
            pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(ValidationError::EmptyField($label));
                }
                Ok(Self(raw))
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_id!(
    /// Identifier of an SSH command [`Session`](crate::session::Session).
    SessionId,
    "session id"
);

define_id!(
    /// Identifier of an [`InstallationJob`](crate::installation::InstallationJob).
    InstallationId,
    "installation id"
);
