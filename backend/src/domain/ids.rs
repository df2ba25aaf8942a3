//! Typed identifiers for users, cars, rentals and payments.

use thiserror::Error;

/// Returned when a string does not parse as the expected identifier kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} id must be a valid UUID")]
pub struct IdParseError {
    kind: &'static str,
}

impl IdParseError {
    /// Identifier kind that failed to parse, e.g. `"rental"`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                if value.trim() != value {
                    return Err(IdParseError { kind: $kind });
                }
                uuid::Uuid::parse_str(value)
                    .map(Self)
                    .map_err(|_| IdParseError { kind: $kind })
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id! {
    /// Stable user identifier.
    UserId => "user"
}

define_id! {
    /// Stable car identifier.
    CarId => "car"
}

define_id! {
    /// Stable rental identifier.
    RentalId => "rental"
}

define_id! {
    /// Stable payment identifier.
    PaymentId => "payment"
}
