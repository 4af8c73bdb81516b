mod account;
mod errors;
mod transfer;

use std::fmt;
use std::fmt::{Display, Formatter};

pub use account::Account;
pub use errors::{ErrorClass, LedgerError};
pub use transfer::Transfer;

/// Closed set of transfer states.
///
/// `Pending` may transition to `Failed` via cancellation; `Completed` is
/// terminal and immutable; only `Failed` records may be deleted.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TransferStatus {
    Pending,
    Completed,
    Failed
}

impl Display for TransferStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransferStatus::Pending => "PENDING",
            TransferStatus::Completed => "COMPLETED",
            TransferStatus::Failed => "FAILED"
        };
        write!(formatter, "{label}")
    }
}
