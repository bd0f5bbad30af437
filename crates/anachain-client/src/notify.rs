use crate::{errors::ClientError, types::Confirmation};
use anachain_sdk::AnachainInstruction;
use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};

/// Receives a user-facing notice for every submitted mutation
pub trait Notifier: Send + Sync {
    fn transaction_confirmed(&self, confirmation: &Confirmation);

    fn transaction_failed(
        &self,
        instruction: &AnachainInstruction,
        account: &Pubkey,
        error: &ClientError,
    );
}

/// Default notifier: logs confirmations with an explorer link, failures as warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn transaction_confirmed(&self, confirmation: &Confirmation) {
        info!(
            "✅ {} on {}: {}",
            confirmation.instruction,
            confirmation.account,
            confirmation.explorer_url()
        );
    }

    fn transaction_failed(
        &self,
        instruction: &AnachainInstruction,
        account: &Pubkey,
        error: &ClientError,
    ) {
        match instruction {
            AnachainInstruction::Initialize => {
                warn!("❌ Failed to initialize account {}: {}", account, error)
            }
            _ => warn!("❌ {} failed on {}: {}", instruction, account, error),
        }
    }
}
