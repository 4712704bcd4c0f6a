//! Opaque identifiers for pensum entities.
//!
//! Identifiers are plain strings: they carry no schema beyond uniqueness, so
//! data created by hand (or imported) can use readable ids like `"prog1"`.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, time-ordered id.
            pub fn generate() -> Self {
                Self(Ulid::new().to_string())
            }

            /// Borrow the raw string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Subject within one template
    SubjectId
);

string_id!(
    /// Unique identifier for a curriculum Template
    TemplateId
);

string_id!(
    /// Reference to the user owning a template
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = TemplateId::generate();
        let b = TemplateId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 26);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = SubjectId::from("prog1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"prog1\"");
        let back: SubjectId = serde_json::from_str("\"prog1\"").unwrap();
        assert_eq!(back, id);
    }
}
