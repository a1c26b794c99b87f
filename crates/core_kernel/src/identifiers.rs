//! Typed identifiers
//!
//! Each identifier wraps a UUID and displays with a short prefix
//! (`CLM-…`). Serialized and stored forms are the bare UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Failure to parse an identifier from text
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid {kind} '{input}': {reason}")]
pub struct IdParseError {
    pub kind: &'static str,
    pub input: String,
    pub reason: String,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $generate:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Display prefix, without the separator
            pub const PREFIX: &'static str = $prefix;

            pub fn new() -> Self {
                Self($generate())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", Self::PREFIX, self.0)
            }
        }

        /// Accepts both `PREFIX-<uuid>` and a bare UUID
        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bare = s
                    .strip_prefix(Self::PREFIX)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .unwrap_or(s);
                Uuid::parse_str(bare).map(Self).map_err(|e| IdParseError {
                    kind: stringify!($name),
                    input: s.to_string(),
                    reason: e.to_string(),
                })
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(
    /// Claim header key; random so references cannot be guessed
    ClaimId, "CLM", Uuid::new_v4
);

define_id!(
    /// Outbox row key; time-ordered so rows sort by creation
    OutboxEventId, "EVT", Uuid::now_v7
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_display() {
        let id = ClaimId::new();
        let parsed: ClaimId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_error_names_the_kind() {
        let err = "EVT-xyz".parse::<OutboxEventId>().unwrap_err();
        assert_eq!(err.kind, "OutboxEventId");
        assert_eq!(err.input, "EVT-xyz");
    }

    #[test]
    fn test_generator_versions() {
        assert_eq!(ClaimId::new().as_uuid().get_version_num(), 4);
        assert_eq!(OutboxEventId::new().as_uuid().get_version_num(), 7);
    }
}
