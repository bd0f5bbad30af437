use super::{connect, parse_address};
use crate::{config::Settings, error::CliResult};

pub async fn execute(settings: &Settings, address: String) -> CliResult<()> {
    let program = connect(settings, false)?;
    let account = program.account(parse_address(&address)?);

    match account.fetch().await? {
        Some(state) => {
            println!("📊 Account {}", account.address());
            println!("   Count: {}", state.count);
        }
        None => println!("❌ No counter account at {}", account.address()),
    }

    Ok(())
}
