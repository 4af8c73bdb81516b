use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::models::{Account, Transfer, TransferStatus};
use crate::storage::{AccountStore, StoreError, TransferStore};
use crate::types::{AccountId, TransferId};

/// DashMap-backed account store.
///
/// Ids come from a monotonic counter, so ascending-id order is insertion
/// order; every multi-result query returns records in that order.
pub struct InMemoryAccountStore {
    records: DashMap<AccountId, Account>,
    next_id: AtomicU64
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1)
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_number(&self, account_number: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.records.iter()
            .find(|entry| entry.value().account_number == account_number)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self.records.iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.id);

        Ok(accounts)
    }

    async fn save(&self, mut account: Account) -> Result<Account, StoreError> {
        let id = match account.id {
            Some(id) => id,
            None => self.next_id.fetch_add(1, Ordering::SeqCst)
        };

        account.id = Some(id);
        self.records.insert(id, account.clone());

        Ok(account)
    }

    async fn delete_by_id(&self, id: AccountId) -> Result<(), StoreError> {
        self.records.remove(&id);
        Ok(())
    }

    async fn exists_by_number(&self, account_number: &str) -> Result<bool, StoreError> {
        Ok(self.records.iter().any(|entry| entry.value().account_number == account_number))
    }
}

/// DashMap-backed transfer store with the same id-assignment scheme as the
/// account store.
pub struct InMemoryTransferStore {
    records: DashMap<TransferId, Transfer>,
    next_id: AtomicU64
}

impl InMemoryTransferStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1)
        }
    }

    fn collect_sorted(&self, predicate: impl Fn(&Transfer) -> bool) -> Vec<Transfer> {
        let mut transfers: Vec<Transfer> = self.records.iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        transfers.sort_by_key(|transfer| transfer.id);
        transfers
    }
}

#[async_trait]
impl TransferStore for InMemoryTransferStore {
    async fn find_by_id(&self, id: TransferId) -> Result<Option<Transfer>, StoreError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<Transfer>, StoreError> {
        Ok(self.collect_sorted(|_| true))
    }

    async fn find_by_source_id(&self, account_id: AccountId) -> Result<Vec<Transfer>, StoreError> {
        Ok(self.collect_sorted(|transfer| transfer.source_account_id == Some(account_id)))
    }

    async fn find_by_destination_id(&self, account_id: AccountId) -> Result<Vec<Transfer>, StoreError> {
        Ok(self.collect_sorted(|transfer| transfer.destination_account_id == Some(account_id)))
    }

    async fn find_by_status(&self, status: TransferStatus) -> Result<Vec<Transfer>, StoreError> {
        Ok(self.collect_sorted(|transfer| transfer.status == status))
    }

    async fn save(&self, mut transfer: Transfer) -> Result<Transfer, StoreError> {
        let id = match transfer.id {
            Some(id) => id,
            None => self.next_id.fetch_add(1, Ordering::SeqCst)
        };

        transfer.id = Some(id);
        self.records.insert(id, transfer.clone());

        Ok(transfer)
    }

    async fn delete_by_id(&self, id: TransferId) -> Result<(), StoreError> {
        self.records.remove(&id);
        Ok(())
    }
}
