mod checks;
mod transfer_engine;

pub use checks::{check_distinct_accounts, check_sufficient_funds, validate_transfer};
pub use transfer_engine::{AccountPatch, TransferEngine, TransferFailure, TransferReceipt};
