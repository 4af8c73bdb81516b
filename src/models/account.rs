use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::errors::LedgerError;
use crate::types::AccountId;

/// A single ledger account.
///
/// The balance is the only piece of account state the orchestrator mutates,
/// and it must never go negative. `withdraw` enforces that invariant at the
/// model boundary even though the engine validates sufficiency first.
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal id, assigned by the store on first save.
    pub id: Option<AccountId>,
    /// External-facing unique key.
    pub account_number: String,
    pub owner_name: String,
    /// Exact decimal balance, never negative.
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl Account {
    /// Creates an unsaved account record with the given opening balance.
    pub fn new(account_number: impl Into<String>, owner_name: impl Into<String>, balance: Decimal) -> Self {
        let now = Utc::now();

        Self {
            id: None,
            account_number: account_number.into(),
            owner_name: owner_name.into(),
            balance,
            created_at: now,
            updated_at: now
        }
    }

    /// Removes funds from the balance.
    ///
    /// # Errors
    /// Returns `LedgerError::InsufficientFunds` if the withdrawal would drive
    /// the balance below zero; the balance is left untouched in that case.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if self.balance < amount {
            return Err(LedgerError::insufficient_funds(self, amount));
        }

        self.balance -= amount;
        self.touch();

        Ok(())
    }

    /// Adds funds to the balance.
    pub fn deposit(&mut self, amount: Decimal) {
        self.balance += amount;
        self.touch();
    }

    /// Refreshes the updated-at timestamp after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
