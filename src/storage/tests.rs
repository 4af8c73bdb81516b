use super::{AccountStore, InMemoryAccountStore, InMemoryTransferStore, StoreError, TransferStore};

use std::str::FromStr;

use anyhow::{Result, anyhow};
use rust_decimal::Decimal;

use crate::models::{Account, Transfer, TransferStatus};

fn create_account(account_number: &str, balance: &str) -> Result<Account> {
    Ok(Account::new(account_number, "Test Owner", Decimal::from_str(balance)?))
}

#[tokio::test]
async fn test_save_assigns_sequential_ids() -> Result<()> {
    let store = InMemoryAccountStore::new();

    let first = store.save(create_account("ACC-001", "10.00")?).await?;
    let second = store.save(create_account("ACC-002", "20.00")?).await?;

    assert_eq!(first.id, Some(1));
    assert_eq!(second.id, Some(2));

    Ok(())
}

#[tokio::test]
async fn test_account_lookup_by_number_and_id() -> Result<()> {
    let store = InMemoryAccountStore::new();
    let saved = store.save(create_account("ACC-001", "10.00")?).await?;

    let by_number = store.find_by_number("ACC-001").await?
        .ok_or_else(|| anyhow!("account missing by number"))?;
    let by_id = store.find_by_id(saved.id.unwrap()).await?
        .ok_or_else(|| anyhow!("account missing by id"))?;

    assert_eq!(by_number.account_number, "ACC-001");
    assert_eq!(by_id.account_number, "ACC-001");
    assert!(store.find_by_number("ACC-404").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_save_with_existing_id_overwrites_the_record() -> Result<()> {
    let store = InMemoryAccountStore::new();
    let mut saved = store.save(create_account("ACC-001", "10.00")?).await?;

    saved.balance = Decimal::from_str("75.00")?;
    store.save(saved).await?;

    let reloaded = store.find_by_number("ACC-001").await?
        .ok_or_else(|| anyhow!("account missing after overwrite"))?;

    assert_eq!(reloaded.balance, Decimal::from_str("75.00")?);
    assert_eq!(store.find_all().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_exists_and_delete_round_out_the_account_contract() -> Result<()> {
    let store = InMemoryAccountStore::new();
    let saved = store.save(create_account("ACC-001", "0.00")?).await?;

    assert!(store.exists_by_number("ACC-001").await?);

    store.delete_by_id(saved.id.unwrap()).await?;

    assert!(!store.exists_by_number("ACC-001").await?);
    assert!(store.find_by_id(saved.id.unwrap()).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_transfer_queries_filter_by_account_and_status() -> Result<()> {
    let store = InMemoryTransferStore::new();
    let amount = Decimal::from_str("50.00")?;

    store.save(Transfer::completed(1, 2, amount, "first")).await?;
    store.save(Transfer::failed(Some(2), Some(1), amount, "second")).await?;
    store.save(Transfer::pending(1, 2, amount, "third")).await?;

    assert_eq!(store.find_by_source_id(1).await?.len(), 2);
    assert_eq!(store.find_by_destination_id(1).await?.len(), 1);
    assert_eq!(store.find_by_status(TransferStatus::Pending).await?.len(), 1);
    assert_eq!(store.find_by_status(TransferStatus::Completed).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_find_all_returns_transfers_in_insertion_order() -> Result<()> {
    let store = InMemoryTransferStore::new();
    let amount = Decimal::from_str("5.00")?;

    for description in ["a", "b", "c"] {
        store.save(Transfer::completed(1, 2, amount, description)).await?;
    }

    let all = store.find_all().await?;
    let descriptions: Vec<&str> = all.iter().map(|transfer| transfer.description.as_str()).collect();

    assert_eq!(descriptions, vec!["a", "b", "c"]);

    Ok(())
}

#[tokio::test]
async fn test_transfer_delete_removes_the_record() -> Result<()> {
    let store = InMemoryTransferStore::new();
    let saved = store.save(Transfer::failed(None, None, Decimal::from_str("1.00")?, "x")).await?;

    store.delete_by_id(saved.id.unwrap()).await?;

    assert!(store.find_by_id(saved.id.unwrap()).await?.is_none());
    assert!(store.find_all().await?.is_empty());

    Ok(())
}

#[test]
fn test_store_error_messages_name_the_failure_mode() {
    assert!(StoreError::Unavailable("offline".to_string()).to_string().contains("unavailable"));
    assert!(StoreError::Corrupt("no id".to_string()).to_string().contains("corrupt"));
}
