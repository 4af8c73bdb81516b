//! Pure ledger invariant checks, evaluated against resolved account state
//! before any balance is touched.

use rust_decimal::Decimal;

use crate::models::{Account, LedgerError};

pub fn check_sufficient_funds(source: &Account, amount: Decimal) -> Result<(), LedgerError> {
    if source.balance < amount {
        return Err(LedgerError::insufficient_funds(source, amount));
    }

    Ok(())
}

pub fn check_distinct_accounts(source: &Account, destination: &Account) -> Result<(), LedgerError> {
    if let (Some(source_id), Some(destination_id)) = (source.id, destination.id) {
        if source_id == destination_id {
            return Err(LedgerError::same_account(source));
        }
    }

    Ok(())
}

/// Validates a proposed transfer: sufficiency first, then distinctness.
pub fn validate_transfer(source: &Account, destination: &Account, amount: Decimal) -> Result<(), LedgerError> {
    check_sufficient_funds(source, amount)?;
    check_distinct_accounts(source, destination)?;

    Ok(())
}
