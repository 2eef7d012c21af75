//! Strongly-typed ID wrappers
//!
//! Identifiers are opaque strings: movements created locally get a UUID, while
//! the remote API may hand out numeric ids. Both are normalized to the same
//! string form on the way in, so comparisons never depend on the JSON type the
//! id arrived as.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Either form an id may take in a JSON payload
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Int(n) => n.to_string(),
            // 42.0 -> "42"
            RawId::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", f as i64),
            RawId::Float(f) => f.to_string(),
        }
    }
}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for ids that carry no value (never assigned)
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// First eight characters, for compact listings
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((idx, _)) => &self.0[..idx],
                    None => &self.0,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.trim().to_string())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.trim().to_string())
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                Self(n.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

define_id!(MovementId);
define_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let a = MovementId::new();
        let b = MovementId::new();
        assert_ne!(a, b);
        assert!(!a.is_blank());
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_numeric_and_text_ids_compare_equal() {
        let from_number: UserId = serde_json::from_str("7").unwrap();
        let from_text: UserId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_number, from_text);
        assert_eq!(from_number, UserId::from(7i64));

        let from_float: UserId = serde_json::from_str("7.0").unwrap();
        assert_eq!(from_float, from_text);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = MovementId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
    }

    #[test]
    fn test_short_and_blank() {
        let id = MovementId::from("0123456789abcdef");
        assert_eq!(id.short(), "01234567");
        assert_eq!(MovementId::from("42").short(), "42");
        assert!(MovementId::from("   ").is_blank());
    }
}
