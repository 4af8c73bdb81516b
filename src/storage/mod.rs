mod memory;
#[cfg(test)]
mod tests;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, Transfer, TransferStatus};
use crate::types::{AccountId, TransferId};

pub use memory::{InMemoryAccountStore, InMemoryTransferStore};

/// Failure surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("Stored record is corrupt: {0}")]
    Corrupt(String)
}

/// Point lookup and save of account records.
///
/// Stores never apply business rules; the engine is the only component that
/// mutates balances.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_number(&self, account_number: &str) -> Result<Option<Account>, StoreError>;
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;
    async fn find_all(&self) -> Result<Vec<Account>, StoreError>;
    /// Persists the record, assigning an id on first save, and returns the
    /// saved copy.
    async fn save(&self, account: Account) -> Result<Account, StoreError>;
    async fn delete_by_id(&self, id: AccountId) -> Result<(), StoreError>;
    async fn exists_by_number(&self, account_number: &str) -> Result<bool, StoreError>;
}

/// Lookup, save, and delete of transfer records, plus the filtered reads the
/// orchestrator needs for history and deletion guards.
#[async_trait]
pub trait TransferStore: Send + Sync {
    async fn find_by_id(&self, id: TransferId) -> Result<Option<Transfer>, StoreError>;
    async fn find_all(&self) -> Result<Vec<Transfer>, StoreError>;
    async fn find_by_source_id(&self, account_id: AccountId) -> Result<Vec<Transfer>, StoreError>;
    async fn find_by_destination_id(&self, account_id: AccountId) -> Result<Vec<Transfer>, StoreError>;
    async fn find_by_status(&self, status: TransferStatus) -> Result<Vec<Transfer>, StoreError>;
    /// Persists the record, assigning an id on first save, and returns the
    /// saved copy.
    async fn save(&self, transfer: Transfer) -> Result<Transfer, StoreError>;
    async fn delete_by_id(&self, id: TransferId) -> Result<(), StoreError>;
}
