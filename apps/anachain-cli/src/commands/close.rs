use super::{connect, parse_address, print_confirmation};
use crate::{config::Settings, error::CliResult};

pub async fn execute(settings: &Settings, address: String) -> CliResult<()> {
    let program = connect(settings, true)?;
    let account = program.account(parse_address(&address)?);

    let confirmation = account.close().await?;
    print_confirmation(&confirmation);

    match account.fetch().await? {
        None => println!("🗑️  Account {} closed, rent returned to the payer", account.address()),
        Some(state) => println!("⚠️  Account still readable (count: {})", state.count),
    }

    Ok(())
}
