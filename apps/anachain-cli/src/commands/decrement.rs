use super::{connect, parse_address, print_confirmation};
use crate::{config::Settings, error::CliResult};

pub async fn execute(settings: &Settings, address: String) -> CliResult<()> {
    let program = connect(settings, true)?;
    let account = program.account(parse_address(&address)?);

    let confirmation = account.decrement().await?;
    print_confirmation(&confirmation);

    if let Some(state) = account.fetch().await? {
        println!("📊 Count: {}", state.count);
    }

    Ok(())
}
