use super::{connect, print_confirmation};
use crate::{
    config::Settings,
    error::{CliError, CliResult},
};
use solana_sdk::signature::{write_keypair_file, Keypair, Signer};
use std::path::PathBuf;

pub async fn execute(settings: &Settings, keypair_out: Option<PathBuf>) -> CliResult<()> {
    let program = connect(settings, true)?;
    let account = Keypair::new();

    println!("🏗️  Initializing counter account {}", account.pubkey());
    println!("   Program: {} ({})", program.program_id(), program.cluster());

    if let Some(path) = &keypair_out {
        write_keypair_file(&account, path).map_err(|e| {
            CliError::InvalidArgument(format!(
                "Failed to write keypair to {}: {}",
                path.display(),
                e
            ))
        })?;
        println!("🔑 Account keypair saved to {}", path.display());
    }

    let confirmation = program.initialize(&account).await?;
    print_confirmation(&confirmation);

    if let Some(state) = program.account(account.pubkey()).fetch().await? {
        println!("📊 Count: {}", state.count);
    }

    Ok(())
}
