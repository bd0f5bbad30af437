use super::connect;
use crate::{config::Settings, error::CliResult};

pub async fn execute(settings: &Settings) -> CliResult<()> {
    let program = connect(settings, false)?;

    println!("🌐 Cluster: {}", program.cluster());
    println!("   RPC URL: {}", settings.rpc_url);
    println!("   Program: {}", program.program_id());

    match program.program_account().await? {
        Some(info) => {
            println!("✅ Program account found");
            println!("   Executable: {}", info.executable);
            println!("   Owner: {}", info.owner);
            println!("   Lamports: {}", info.lamports);
            println!("   Data length: {}", info.data_len);
        }
        None => println!("❌ Program account not found on {}", program.cluster()),
    }

    Ok(())
}
