/*!
# Ledger Boundary

The four RPC calls the client needs, behind a trait so tests can swap in an
in-process ledger. [`RpcLedger`] is the production implementation.
*/

use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError as RpcClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
    rpc_request::RpcError,
};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger could not be reached or did not answer in time
    #[error("ledger unreachable: {0}")]
    Unreachable(String),

    /// The ledger processed the request and refused it
    #[error("rejected by ledger: {0}")]
    Rejected(String),
}

/// Shared handle to a ledger connection
pub type SharedLedger = Arc<dyn Ledger>;

#[async_trait]
pub trait Ledger: Send + Sync + 'static {
    /// `Ok(None)` when no account lives at `address`
    async fn get_account(&self, address: &Pubkey) -> LedgerResult<Option<Account>>;

    /// Accounts owned by `program_id` whose data starts with `discriminator`
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> LedgerResult<Vec<(Pubkey, Account)>>;

    async fn latest_blockhash(&self) -> LedgerResult<Hash>;

    /// Submit a signed transaction and wait until it is confirmed or rejected
    async fn send_and_confirm(&self, transaction: &Transaction) -> LedgerResult<Signature>;
}

/// [`Ledger`] backed by a Solana JSON-RPC endpoint
pub struct RpcLedger {
    rpc_client: Arc<RpcClient>,
}

impl RpcLedger {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self::from_client(Arc::new(RpcClient::new_with_commitment(
            rpc_url, commitment,
        )))
    }

    pub fn from_client(rpc_client: Arc<RpcClient>) -> Self {
        Self { rpc_client }
    }

    /// Get the RPC client (for advanced operations)
    pub fn rpc_client(&self) -> &RpcClient {
        &self.rpc_client
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn get_account(&self, address: &Pubkey) -> LedgerResult<Option<Account>> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.rpc_client.commitment())
            .await
            .map_err(classify_rpc_error)?;
        Ok(response.value)
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> LedgerResult<Vec<(Pubkey, Account)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                0,
                discriminator.to_vec(),
            ))]),
            account_config: RpcAccountInfoConfig {
                commitment: Some(self.rpc_client.commitment()),
                ..Default::default()
            },
            ..Default::default()
        };

        self.rpc_client
            .get_program_accounts_with_config(program_id, config)
            .await
            .map_err(classify_rpc_error)
    }

    async fn latest_blockhash(&self) -> LedgerResult<Hash> {
        self.rpc_client
            .get_latest_blockhash()
            .await
            .map_err(classify_rpc_error)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        self.rpc_client
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(classify_rpc_error)
    }
}

/// Anything carrying a transaction error (preflight or on-chain) is a rejection,
/// as is any JSON-RPC error response: the node answered and refused the request.
/// Everything else means we never got an answer.
fn classify_rpc_error(error: RpcClientError) -> LedgerError {
    if let Some(transaction_error) = error.get_transaction_error() {
        debug!("RPC reported transaction error: {}", transaction_error);
        return LedgerError::Rejected(transaction_error.to_string());
    }

    match error.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. }) => {
            debug!("RPC refused request ({}): {}", code, message);
            LedgerError::Rejected(format!("{message} (code {code})"))
        }
        _ => LedgerError::Unreachable(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_client::rpc_request::RpcResponseErrorData;
    use solana_sdk::{instruction::InstructionError, transaction::TransactionError};

    #[test]
    fn test_transaction_errors_are_rejections() {
        let error = RpcClientError::from(ClientErrorKind::TransactionError(
            TransactionError::InstructionError(0, InstructionError::Custom(6000)),
        ));
        assert!(matches!(
            classify_rpc_error(error),
            LedgerError::Rejected(_)
        ));
    }

    #[test]
    fn test_io_errors_are_unreachable() {
        let error = RpcClientError::from(ClientErrorKind::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )));
        assert!(matches!(
            classify_rpc_error(error),
            LedgerError::Unreachable(_)
        ));
    }

    #[test]
    fn test_rpc_error_responses_are_rejections() {
        let error = RpcClientError::from(ClientErrorKind::RpcError(
            RpcError::RpcResponseError {
                code: -32003,
                message: "Transaction signature verification failure".to_string(),
                data: RpcResponseErrorData::Empty,
            },
        ));
        match classify_rpc_error(error) {
            LedgerError::Rejected(reason) => {
                assert!(reason.contains("signature verification"));
                assert!(reason.contains("-32003"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_confirmation_timeout_is_unreachable() {
        let error = RpcClientError::from(ClientErrorKind::RpcError(RpcError::ForUser(
            "unable to confirm transaction".to_string(),
        )));
        assert!(matches!(
            classify_rpc_error(error),
            LedgerError::Unreachable(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_failure() {
        // Nothing listens on the discard port
        let ledger = RpcLedger::new(
            "http://127.0.0.1:9".to_string(),
            CommitmentConfig::confirmed(),
        );
        let result = ledger.get_account(&Pubkey::new_unique()).await;
        assert!(matches!(result, Err(LedgerError::Unreachable(_))));
    }
}
