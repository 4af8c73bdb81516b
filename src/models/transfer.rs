use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::TransferStatus;
use crate::types::{AccountId, TransferId};

/// One persisted transfer attempt, successful or not.
///
/// The account references are optional because an audit record is written
/// even when one or both account numbers never resolved.
#[derive(Debug, Clone)]
pub struct Transfer {
    /// Internal id, assigned by the store on first save.
    pub id: Option<TransferId>,
    pub source_account_id: Option<AccountId>,
    pub destination_account_id: Option<AccountId>,
    /// Strictly positive; enforced at the boundary before the engine runs.
    pub amount: Decimal,
    /// Free text, possibly annotated by the engine on failure/cancellation.
    pub description: String,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>
}

impl Transfer {
    fn new(
        source_account_id: Option<AccountId>,
        destination_account_id: Option<AccountId>,
        amount: Decimal,
        description: String,
        status: TransferStatus
    ) -> Self {
        Self {
            id: None,
            source_account_id,
            destination_account_id,
            amount,
            description,
            status,
            created_at: Utc::now()
        }
    }

    /// Record of a transfer whose balance movements were applied.
    pub fn completed(
        source_account_id: AccountId,
        destination_account_id: AccountId,
        amount: Decimal,
        description: impl Into<String>
    ) -> Self {
        Self::new(
            Some(source_account_id),
            Some(destination_account_id),
            amount,
            description.into(),
            TransferStatus::Completed
        )
    }

    /// Record of an attempt that has not yet moved money.
    pub fn pending(
        source_account_id: AccountId,
        destination_account_id: AccountId,
        amount: Decimal,
        description: impl Into<String>
    ) -> Self {
        Self::new(
            Some(source_account_id),
            Some(destination_account_id),
            amount,
            description.into(),
            TransferStatus::Pending
        )
    }

    /// Audit record of an attempt that moved no money. Either account
    /// reference may be absent when the number did not resolve.
    pub fn failed(
        source_account_id: Option<AccountId>,
        destination_account_id: Option<AccountId>,
        amount: Decimal,
        description: impl Into<String>
    ) -> Self {
        Self::new(
            source_account_id,
            destination_account_id,
            amount,
            description.into(),
            TransferStatus::Failed
        )
    }
}
