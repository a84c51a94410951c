//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are opaque
//! strings issued by the backend (provider subject IDs, auto-generated
//! document IDs), so the wrapper is string-backed rather than numeric.

/// Errors that can occur when parsing an ID type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The input contains a document path separator.
    #[error("id cannot contain '/'")]
    ContainsSlash,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` validating the backend's ID constraints
/// - `Display`, `FromStr`, and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use guava_market_core::define_id;
/// define_id!(SubjectId);
/// define_id!(OrderId);
///
/// let subject_id = SubjectId::parse("abc123").unwrap();
/// let order_id = OrderId::parse("abc123").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: SubjectId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an ID from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty or contains a `/`
            /// (document IDs address a single path segment in the backend).
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                if s.is_empty() {
                    return Err($crate::IdError::Empty);
                }
                if s.contains('/') {
                    return Err($crate::IdError::ContainsSlash);
                }
                Ok(Self(s.to_owned()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(SubjectId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = SubjectId::parse("abc123").unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(SubjectId::parse(""), Err(IdError::Empty)));
    }

    #[test]
    fn test_parse_rejects_slash() {
        assert!(matches!(
            OrderId::parse("orders/abc"),
            Err(IdError::ContainsSlash)
        ));
    }

    #[test]
    fn test_display() {
        let id = OrderId::parse("xyz-789").unwrap();
        assert_eq!(format!("{id}"), "xyz-789");
    }

    #[test]
    fn test_from_str() {
        let id: SubjectId = "user-1".parse().unwrap();
        assert_eq!(id.as_str(), "user-1");
    }

    #[test]
    fn test_serde_transparent() {
        let id = SubjectId::parse("abc123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");

        let parsed: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Compile-time property; spot-check equality within one type.
        let a = SubjectId::parse("same").unwrap();
        let b = SubjectId::parse("same").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_into_inner() {
        let id = OrderId::parse("abc").unwrap();
        assert_eq!(id.into_inner(), "abc");
    }
}
