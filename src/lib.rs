//! Transfer orchestration and ledger-consistency engine.
//!
//! Moves money between two named accounts and records a durable audit trail
//! of every attempt, successful or not. The crate is organized as:
//!
//! - [`models`] - Domain records (Account, Transfer) and the typed error set
//! - [`storage`] - Store contracts and the in-memory implementation
//! - [`engine`] - The transfer orchestrator and its ledger invariant checks
//! - [`types`] - Id aliases
//!
//! The engine is the only writer of transfer records and the only component
//! permitted to mutate account balances; stores never apply business rules.

pub mod engine;
pub mod models;
pub mod storage;
pub mod types;
