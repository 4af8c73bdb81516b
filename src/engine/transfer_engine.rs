use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::engine::checks;
use crate::models::{Account, LedgerError, Transfer, TransferStatus};
use crate::storage::{AccountStore, StoreError, TransferStore};
use crate::types::{AccountId, TransferId};

/// Summary of one transfer attempt, produced for successes and failures alike
/// so callers can trace even rejected attempts.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    /// Id of the persisted transfer record. None only when the audit write
    /// itself failed.
    pub id: Option<TransferId>,
    pub source_account_number: String,
    pub destination_account_number: String,
    pub amount: Decimal,
    pub description: String,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
    pub message: String
}

/// A rejected transfer: the typed reason plus the structured receipt
/// referencing the audit record written for the attempt.
#[derive(Debug, Error)]
#[error("Transfer failed: {reason}")]
pub struct TransferFailure {
    pub receipt: TransferReceipt,
    pub reason: LedgerError
}

/// Partial update for an account; absent fields are left untouched. The
/// balance, when present, was already checked non-negative at the boundary.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub owner_name: Option<String>,
    pub balance: Option<Decimal>
}

/// The transfer orchestrator: sequences lookups, invariant checks, balance
/// mutation, and persistence, and owns the transfer status state machine.
///
/// Every failure after a request is accepted still produces a durable FAILED
/// record (best effort), so the audit trail covers attempts that moved no
/// money. The engine holds no locks across requests: two concurrent transfers
/// touching the same account race with last-write-wins semantics on save.
pub struct TransferEngine<A, T> {
    accounts: Arc<A>,
    transfers: Arc<T>
}

impl<A: AccountStore, T: TransferStore> TransferEngine<A, T> {
    pub fn new(accounts: Arc<A>, transfers: Arc<T>) -> Self {
        Self { accounts, transfers }
    }

    /// Moves `amount` between the two accounts identified by number.
    ///
    /// On success both balances are updated, a COMPLETED record is persisted,
    /// and the receipt summarizes it. On any failure a FAILED audit record is
    /// written and the returned error carries a FAILED receipt referencing it.
    pub async fn perform_transfer(
        &self,
        source_number: &str,
        destination_number: &str,
        amount: Decimal,
        description: Option<&str>
    ) -> Result<TransferReceipt, TransferFailure> {
        info!("Starting transfer of {amount} from [{source_number}] to [{destination_number}]");

        match self.execute_transfer(source_number, destination_number, amount, description).await {
            Ok(receipt) => {
                info!("Transfer completed: id {:?}", receipt.id);
                Ok(receipt)
            }
            Err(reason) => {
                warn!("Transfer from [{source_number}] to [{destination_number}] failed: {reason}");

                let audit_id = self
                    .record_failed_attempt(source_number, destination_number, amount, description, &reason)
                    .await;

                Err(TransferFailure {
                    receipt: TransferReceipt {
                        id: audit_id,
                        source_account_number: source_number.to_string(),
                        destination_account_number: destination_number.to_string(),
                        amount,
                        description: description.unwrap_or_default().to_string(),
                        status: TransferStatus::Failed,
                        created_at: Utc::now(),
                        message: format!("Error: {reason}")
                    },
                    reason
                })
            }
        }
    }

    async fn execute_transfer(
        &self,
        source_number: &str,
        destination_number: &str,
        amount: Decimal,
        description: Option<&str>
    ) -> Result<TransferReceipt, LedgerError> {
        let mut source = self.find_account(source_number).await?;
        let mut destination = self.find_account(destination_number).await?;

        checks::validate_transfer(&source, &destination, amount)?;

        source.withdraw(amount)?;
        destination.deposit(amount);

        //NOTE: Two independent saves. If the second fails after the first
        //      succeeded the ledger is left inconsistent; known limitation,
        //      documented along with the missing version check on save.
        let source = self.accounts.save(source).await?;
        let destination = self.accounts.save(destination).await?;

        let record = Transfer::completed(
            stored_id(&source)?,
            stored_id(&destination)?,
            amount,
            description.unwrap_or_default()
        );
        let saved = self.transfers.save(record).await?;

        Ok(TransferReceipt {
            id: saved.id,
            source_account_number: source.account_number,
            destination_account_number: destination.account_number,
            amount: saved.amount,
            description: saved.description,
            status: saved.status,
            created_at: saved.created_at,
            message: "Transfer completed successfully".to_string()
        })
    }

    /// Best-effort audit write for a failed attempt. Each account number is
    /// resolved independently so the record still references whichever side
    /// exists. A store failure here is not retried; the caller gets the
    /// original error either way.
    async fn record_failed_attempt(
        &self,
        source_number: &str,
        destination_number: &str,
        amount: Decimal,
        description: Option<&str>,
        reason: &LedgerError
    ) -> Option<TransferId> {
        let source_id = self.resolve_id(source_number).await;
        let destination_id = self.resolve_id(destination_number).await;

        let annotated = match description {
            Some(text) if source_id.is_some() || destination_id.is_some() => {
                format!("{text} - FAILED: {reason}")
            }
            _ => format!("FAILED: {reason}")
        };

        let record = Transfer::failed(source_id, destination_id, amount, annotated);

        match self.transfers.save(record).await {
            Ok(saved) => saved.id,
            Err(store_error) => {
                error!("Audit record for failed transfer could not be persisted: {store_error}");
                None
            }
        }
    }

    async fn resolve_id(&self, account_number: &str) -> Option<AccountId> {
        match self.accounts.find_by_number(account_number).await {
            Ok(found) => found.and_then(|account| account.id),
            Err(store_error) => {
                error!("Account lookup for audit record failed: {store_error}");
                None
            }
        }
    }

    /// Cancels a pending transfer, marking it FAILED.
    ///
    /// Balances are never reversed here: a transfer only reaches COMPLETED
    /// after balances are applied, so a PENDING transfer has moved no money.
    pub async fn cancel_transfer(&self, transfer_id: TransferId) -> Result<Transfer, LedgerError> {
        info!("Cancelling transfer: {transfer_id}");

        let mut transfer = self.transfers.find_by_id(transfer_id).await?
            .ok_or_else(|| LedgerError::transfer_not_found(transfer_id))?;

        if transfer.status != TransferStatus::Pending {
            return Err(LedgerError::invalid_state(transfer_id, transfer.status, TransferStatus::Pending));
        }

        transfer.status = TransferStatus::Failed;
        transfer.description.push_str(" - CANCELADA POR USUARIO");

        let saved = self.transfers.save(transfer).await?;
        info!("Transfer cancelled: id {:?}", saved.id);

        Ok(saved)
    }

    /// Applies the fields present in the patch; blank owner names are
    /// ignored. Persists (and touches updated-at) only when something
    /// changed. No audit record is written for account updates.
    pub async fn update_account(&self, account_number: &str, patch: AccountPatch) -> Result<Account, LedgerError> {
        info!("Updating account: {account_number}");

        let mut account = self.find_account(account_number).await?;
        let mut changed = false;

        if let Some(owner_name) = patch.owner_name {
            if !owner_name.trim().is_empty() {
                account.owner_name = owner_name;
                changed = true;
            }
        }

        if let Some(balance) = patch.balance {
            account.balance = balance;
            changed = true;
        }

        if !changed {
            return Ok(account);
        }

        account.touch();
        Ok(self.accounts.save(account).await?)
    }

    /// Deletes an account once it holds no funds and no pending outgoing
    /// transfer references it. Incoming transfers are not checked.
    pub async fn delete_account(&self, account_number: &str) -> Result<(), LedgerError> {
        info!("Deleting account: {account_number}");

        let account = self.find_account(account_number).await?;

        if !account.balance.is_zero() {
            return Err(LedgerError::non_zero_balance(&account));
        }

        let account_id = stored_id(&account)?;
        let outgoing = self.transfers.find_by_source_id(account_id).await?;

        if outgoing.iter().any(|transfer| transfer.status == TransferStatus::Pending) {
            return Err(LedgerError::has_pending_transfers(&account));
        }

        self.accounts.delete_by_id(account_id).await?;
        info!("Account deleted: {account_number}");

        Ok(())
    }

    /// Deletes a FAILED transfer. COMPLETED and PENDING records are part of
    /// the audit trail and can never be removed.
    pub async fn delete_transfer(&self, transfer_id: TransferId) -> Result<(), LedgerError> {
        info!("Deleting transfer: {transfer_id}");

        let transfer = self.transfers.find_by_id(transfer_id).await?
            .ok_or_else(|| LedgerError::transfer_not_found(transfer_id))?;

        if transfer.status != TransferStatus::Failed {
            return Err(LedgerError::invalid_state(transfer_id, transfer.status, TransferStatus::Failed));
        }

        self.transfers.delete_by_id(transfer_id).await?;
        info!("Transfer deleted: id {transfer_id}");

        Ok(())
    }

    pub async fn get_all_transfers(&self) -> Result<Vec<Transfer>, LedgerError> {
        Ok(self.transfers.find_all().await?)
    }

    pub async fn get_transfer_by_id(&self, transfer_id: TransferId) -> Result<Option<Transfer>, LedgerError> {
        Ok(self.transfers.find_by_id(transfer_id).await?)
    }

    /// Transfers sent by the account followed by transfers received by it,
    /// each group in store order.
    pub async fn get_transfer_history(&self, account_number: &str) -> Result<Vec<Transfer>, LedgerError> {
        let account = self.find_account(account_number).await?;
        let account_id = stored_id(&account)?;

        let mut history = self.transfers.find_by_source_id(account_id).await?;
        history.extend(self.transfers.find_by_destination_id(account_id).await?);

        Ok(history)
    }

    pub async fn get_all_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.accounts.find_all().await?)
    }

    pub async fn get_account_by_number(&self, account_number: &str) -> Result<Option<Account>, LedgerError> {
        Ok(self.accounts.find_by_number(account_number).await?)
    }

    async fn find_account(&self, account_number: &str) -> Result<Account, LedgerError> {
        self.accounts.find_by_number(account_number).await?
            .ok_or_else(|| LedgerError::account_not_found(account_number))
    }
}

/// Records loaded from a store always carry an id; a missing one means the
/// backend handed back a corrupt row.
fn stored_id(account: &Account) -> Result<AccountId, LedgerError> {
    account.id.ok_or_else(|| {
        LedgerError::from(StoreError::Corrupt(format!(
            "account [{}] has no id",
            account.account_number
        )))
    })
}
