use crate::{
    errors::{ClientError, ClientResult},
    ledger::SharedLedger,
};
use anachain_sdk::{build_instruction, AnachainInstruction};
use solana_sdk::{
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Signing capability supplied by the caller (wallet, keypair file, ...)
pub type SharedSigner = Arc<dyn Signer + Send + Sync>;

/// Builds, signs and submits one Anachain instruction per transaction.
///
/// Nothing is retried: a rejected or undeliverable transaction is reported
/// as-is and retry policy is left to the caller.
#[derive(Clone)]
pub struct TransactionSubmitter {
    ledger: SharedLedger,
    payer: SharedSigner,
    program_id: Pubkey,
}

impl TransactionSubmitter {
    pub fn new(ledger: SharedLedger, payer: SharedSigner, program_id: Pubkey) -> Self {
        Self {
            ledger,
            payer,
            program_id,
        }
    }

    /// Get the payer's public key
    pub fn payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Submit `instruction` against `account` and wait for confirmation.
    ///
    /// `co_signer` is the new account's keypair for `initialize`; the payer
    /// signs every transaction.
    pub async fn submit(
        &self,
        instruction: &AnachainInstruction,
        account: &Pubkey,
        co_signer: Option<&Keypair>,
    ) -> ClientResult<Signature> {
        let payer_pubkey = self.payer.pubkey();
        let ix = build_instruction(&self.program_id, &payer_pubkey, account, instruction)?;

        let recent_blockhash = self.ledger.latest_blockhash().await?;

        let mut transaction = Transaction::new_unsigned(Message::new(&[ix], Some(&payer_pubkey)));
        {
            let mut signers: Vec<&dyn Signer> = Vec::with_capacity(2);
            signers.push(&*self.payer);
            if let Some(co_signer) = co_signer {
                signers.push(co_signer);
            }
            transaction
                .try_sign(&signers, recent_blockhash)
                .map_err(|e| ClientError::Signing(e.to_string()))?;
        }

        debug!(
            "Submitting {} for {} (payer: {})",
            instruction, account, payer_pubkey
        );

        match self.ledger.send_and_confirm(&transaction).await {
            Ok(signature) => {
                info!("{} confirmed for {}: {}", instruction, account, signature);
                Ok(signature)
            }
            Err(e) => {
                warn!("{} failed for {}: {}", instruction, account, e);
                Err(e.into())
            }
        }
    }
}
