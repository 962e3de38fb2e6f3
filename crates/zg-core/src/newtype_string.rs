//! Macro for non-empty string identifiers.
//!
//! Table names and term ids are both plain strings on the wire but must never
//! be mixed up or empty. The macro stamps out the wrapper and its trait impls.

/// Error returned when an identifier would be built from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyIdentifier(pub &'static str);

impl std::fmt::Display for EmptyIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must not be empty", self.0)
    }
}

impl std::error::Error for EmptyIdentifier {}

/// Define a non-empty string identifier type.
///
/// Deserialization goes through `TryFrom<String>`, so an empty value is
/// rejected by serde with the [`EmptyIdentifier`] message.
macro_rules! define_newtype_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        $vis struct $Name(String);

        impl $Name {
            /// Build the identifier, panicking on an empty value.
            ///
            /// Input read from files or the catalog goes through
            /// [`try_new`](Self::try_new) instead.
            pub fn new(value: impl Into<String>) -> Self {
                match Self::try_new(value) {
                    Some(id) => id,
                    None => panic!("{}", $crate::newtype_string::EmptyIdentifier(stringify!($Name))),
                }
            }

            /// `None` when `value` is empty.
            pub fn try_new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                (!value.is_empty()).then_some(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $Name {
            type Error = $crate::newtype_string::EmptyIdentifier;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::try_new(value)
                    .ok_or($crate::newtype_string::EmptyIdentifier(stringify!($Name)))
            }
        }

        impl From<$Name> for String {
            fn from(id: $Name) -> String {
                id.0
            }
        }

        impl std::str::FromStr for $Name {
            type Err = $crate::newtype_string::EmptyIdentifier;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(s.to_string())
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::ops::Deref for $Name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

pub(crate) use define_newtype_string;

#[cfg(test)]
mod tests {
    define_newtype_string! {
        struct Sample;
    }

    #[test]
    fn empty_value_is_rejected() {
        assert!(Sample::try_new("").is_none());
        assert!("".parse::<Sample>().is_err());
        let err = serde_json::from_str::<Sample>("\"\"").unwrap_err();
        assert!(err.to_string().contains("Sample must not be empty"));
    }

    #[test]
    fn round_trips_through_json_as_plain_string() {
        let id: Sample = serde_json::from_str("\"orders\"").unwrap();
        assert_eq!(id, "orders");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"orders\"");
    }
}
