use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Account, TransferStatus};
use crate::storage::StoreError;
use crate::types::TransferId;

/// Which remediation a failure calls for on the caller's side: retry with a
/// different key, fix the request, or report the backend outage.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    RuleViolation,
    StoreFailure
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Account not found: [{account_number}]")]
    AccountNotFound {
        account_number: String
    },
    #[error("Transfer not found: [{transfer_id}]")]
    TransferNotFound {
        transfer_id: TransferId
    },
    #[error("Insufficient funds in account [{account_number}]: available {available}, requested {requested}")]
    InsufficientFunds {
        account_number: String,
        available: Decimal,
        requested: Decimal
    },
    #[error("Source and destination are the same account: [{account_number}]")]
    SameAccount {
        account_number: String
    },
    #[error("Transfer [{transfer_id}] is [{status}] but the operation requires [{required}]")]
    InvalidStateTransition {
        transfer_id: TransferId,
        status: TransferStatus,
        required: TransferStatus
    },
    #[error("Account [{account_number}] still holds funds: balance is {balance}")]
    NonZeroBalance {
        account_number: String,
        balance: Decimal
    },
    #[error("Account [{account_number}] has pending outgoing transfers")]
    HasPendingTransfers {
        account_number: String
    },
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError)
}

impl LedgerError {
    //NOTE: Factory constructors keep the call sites in the engine short; most
    //      variants are built from an already-resolved account record.

    pub fn account_not_found(account_number: &str) -> Self {
        Self::AccountNotFound { account_number: account_number.to_string() }
    }

    pub fn transfer_not_found(transfer_id: TransferId) -> Self {
        Self::TransferNotFound { transfer_id }
    }

    pub fn insufficient_funds(account: &Account, requested: Decimal) -> Self {
        Self::InsufficientFunds {
            account_number: account.account_number.clone(),
            available: account.balance,
            requested
        }
    }

    pub fn same_account(account: &Account) -> Self {
        Self::SameAccount { account_number: account.account_number.clone() }
    }

    pub fn invalid_state(transfer_id: TransferId, status: TransferStatus, required: TransferStatus) -> Self {
        Self::InvalidStateTransition { transfer_id, status, required }
    }

    pub fn non_zero_balance(account: &Account) -> Self {
        Self::NonZeroBalance {
            account_number: account.account_number.clone(),
            balance: account.balance
        }
    }

    pub fn has_pending_transfers(account: &Account) -> Self {
        Self::HasPendingTransfers { account_number: account.account_number.clone() }
    }

    /// Three-way taxonomy: "not found", "rejected by a business rule", and
    /// "downstream storage failure" map to different client remediations.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::AccountNotFound { .. } | Self::TransferNotFound { .. } => ErrorClass::NotFound,
            Self::Store(_) => ErrorClass::StoreFailure,
            _ => ErrorClass::RuleViolation
        }
    }
}
