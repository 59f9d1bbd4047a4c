//! Store-assigned identifiers for ledger entities.
//!
//! Identifiers are positive integers, ascending in creation order. Account
//! ids double as the global lock order and the leaderboard tie-break.

use serde::{Deserialize, Serialize};

/// Raised when a raw value cannot be used as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be a positive integer")]
pub struct InvalidIdError {
    kind: &'static str,
}

impl InvalidIdError {
    /// Entity the rejected identifier referred to.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! ledger_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(raw: i64) -> Result<Self, InvalidIdError> {
                if raw <= 0 {
                    return Err(InvalidIdError { kind: $kind });
                }
                Ok(Self(raw))
            }

            /// Raw integer value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| InvalidIdError { kind: $kind })?;
                Self::new(raw)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = InvalidIdError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

ledger_id!(
    /// Identifier of a student account.
    AccountId,
    "account"
);
ledger_id!(
    /// Identifier of a recognition transfer.
    TransferId,
    "recognition"
);
ledger_id!(
    /// Identifier of an endorsement.
    EndorsementId,
    "endorsement"
);
ledger_id!(
    /// Identifier of a voucher redemption.
    RedemptionId,
    "redemption"
);
