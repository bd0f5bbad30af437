use crate::ledger::LedgerError;
use anachain_sdk::SdkError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced to callers. "Not found" is not an error: reads return `Ok(None)`.
///
/// `Clone` so a failed fetch can be stored on its cache entry and handed to every waiter.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("Transaction rejected: {0}")]
    RejectedTransaction(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode account {address}: {reason}")]
    Decoding { address: Pubkey, reason: String },

    #[error("Failed to sign transaction: {0}")]
    Signing(String),

    #[error("Failed to build instruction: {0}")]
    Instruction(String),

    #[error("Cached value does not match query: {0}")]
    CacheMismatch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Whether the failure happened on the ledger side (as opposed to locally or in transit)
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::RejectedTransaction(_))
    }
}

impl From<LedgerError> for ClientError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::Rejected(reason) => ClientError::RejectedTransaction(reason),
            LedgerError::Unreachable(reason) => ClientError::Transport(reason),
        }
    }
}

impl From<SdkError> for ClientError {
    fn from(error: SdkError) -> Self {
        ClientError::Instruction(error.to_string())
    }
}
