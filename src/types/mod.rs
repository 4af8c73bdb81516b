pub type AccountId = u64;
pub type TransferId = u64;
