/*!
# Anachain Client

Submits Anachain counter transactions and keeps a cached, observable view of
counter accounts consistent with the ledger.

## Architecture

- **Ledger**: the four RPC calls the client needs ([`Ledger`], [`RpcLedger`])
- **Reader**: decodes single accounts or the whole program's accounts
- **Submitter**: one instruction per transaction, signed and confirmed, never retried
- **Cache**: [`QueryCache`], invalidated after every confirmed mutation
- **Program / Account**: the handles callers use ([`AnachainProgram`], [`AnachainAccount`])

## Usage

```rust,no_run
use anachain_client::{AnachainProgram, ClientConfig, ClientResult, RpcLedger};
use anachain_sdk::Cluster;
use solana_sdk::signature::Keypair;
use std::sync::Arc;

async fn example(payer: Keypair) -> ClientResult<()> {
    let cluster = Cluster::Devnet;
    let config = ClientConfig::default();
    let ledger = Arc::new(RpcLedger::new(cluster.rpc_url(), config.commitment));
    let program = Arc::new(AnachainProgram::new(cluster, ledger, Arc::new(payer), config));

    let counter = Keypair::new();
    program.initialize(&counter).await?;

    let account = program.account(solana_sdk::signer::Signer::pubkey(&counter));
    account.increment().await?;
    println!("count = {:?}", account.fetch().await?.map(|state| state.count));

    Ok(())
}
```
*/

pub mod account;
pub mod cache;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod notify;
pub mod program;
pub mod reader;
pub mod submitter;
pub mod types;

pub use account::AnachainAccount;
pub use cache::{Entry, EntryStatus, MutationGuard, QueryCache};
pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult};
pub use ledger::{Ledger, LedgerError, LedgerResult, RpcLedger, SharedLedger};
pub use notify::{Notifier, TracingNotifier};
pub use program::{AnachainProgram, LedgerConnector, ProgramCache, ProgramRegistry};
pub use reader::AccountReader;
pub use submitter::{SharedSigner, TransactionSubmitter};
pub use types::{Confirmation, KeyedCounter, ProgramAccountInfo, Query, QueryKey, QueryValue};
