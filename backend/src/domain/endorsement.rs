//! Endorsements: one-per-endorser acknowledgements of a recognition.

use chrono::{DateTime, Utc};

use super::ids::{AccountId, EndorsementId, TransferId};

/// Values for an endorsement about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEndorsement {
    pub transfer_id: TransferId,
    pub endorser_id: AccountId,
    pub created_at: DateTime<Utc>,
}

impl NewEndorsement {
    pub fn into_endorsement(self, id: EndorsementId) -> Endorsement {
        Endorsement {
            id,
            transfer_id: self.transfer_id,
            endorser_id: self.endorser_id,
            created_at: self.created_at,
        }
    }
}

/// An immutable endorsement. `(transfer_id, endorser_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endorsement {
    pub id: EndorsementId,
    pub transfer_id: TransferId,
    pub endorser_id: AccountId,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful endorsement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndorsementReceipt {
    pub endorsement: Endorsement,
    /// Endorsement count of the transfer including the new one.
    pub endorsement_count: i64,
}
