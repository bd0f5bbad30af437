use super::connect;
use crate::{config::Settings, error::CliResult};

pub async fn execute(settings: &Settings) -> CliResult<()> {
    let program = connect(settings, false)?;

    println!(
        "🔍 Listing counter accounts of {} on {}",
        program.program_id(),
        program.cluster()
    );

    let mut accounts = program.fetch_all().await?;
    if accounts.is_empty() {
        println!("   No accounts found");
        return Ok(());
    }

    accounts.sort_by_key(|counter| counter.address);
    for (i, counter) in accounts.iter().enumerate() {
        println!("{}. {}  count: {}", i + 1, counter.address, counter.state.count);
    }
    println!("\n📊 {} account(s)", accounts.len());

    Ok(())
}
