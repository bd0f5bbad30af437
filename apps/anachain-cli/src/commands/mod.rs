use crate::{
    config::Settings,
    error::{CliError, CliResult},
};
use anachain_client::{AnachainProgram, ClientConfig, Confirmation, RpcLedger};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};
use std::{str::FromStr, sync::Arc};
use tracing::debug;

pub mod close;
pub mod decrement;
pub mod increment;
pub mod initialize;
pub mod list;
pub mod program_info;
pub mod set;
pub mod show;

/// Build the program handle for the resolved settings.
///
/// Read-only commands pass `require_keypair = false` and fall back to a
/// throwaway payer when the keypair file cannot be read.
pub fn connect(settings: &Settings, require_keypair: bool) -> CliResult<Arc<AnachainProgram>> {
    let payer = match read_keypair_file(&settings.keypair_path) {
        Ok(keypair) => keypair,
        Err(e) if require_keypair => {
            return Err(CliError::InvalidConfig(format!(
                "Failed to read keypair {}: {}",
                settings.keypair_path.display(),
                e
            )))
        }
        Err(e) => {
            debug!("No usable keypair ({}), using an ephemeral one", e);
            Keypair::new()
        }
    };

    let config = ClientConfig {
        commitment: settings.commitment,
        program_id_override: settings.program_id,
        ..Default::default()
    };
    let ledger = Arc::new(RpcLedger::new(settings.rpc_url.clone(), config.commitment));

    Ok(Arc::new(AnachainProgram::new(
        settings.cluster.clone(),
        ledger,
        Arc::new(payer),
        config,
    )))
}

pub fn parse_address(address: &str) -> CliResult<Pubkey> {
    Pubkey::from_str(address)
        .map_err(|e| CliError::InvalidArgument(format!("Invalid account address {address}: {e}")))
}

pub fn print_confirmation(confirmation: &Confirmation) {
    println!("✅ {} confirmed", confirmation.instruction);
    println!("   Signature: {}", confirmation.signature);
    println!("   Explorer: {}", confirmation.explorer_url());
}
