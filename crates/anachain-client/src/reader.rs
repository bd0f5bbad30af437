use crate::{
    errors::{ClientError, ClientResult},
    ledger::SharedLedger,
    types::{KeyedCounter, ProgramAccountInfo},
};
use anachain_sdk::CounterState;
use solana_sdk::{account::Account, pubkey::Pubkey};
use tracing::debug;

/// Read-only access to Anachain accounts
#[derive(Clone)]
pub struct AccountReader {
    ledger: SharedLedger,
    program_id: Pubkey,
}

impl AccountReader {
    pub fn new(ledger: SharedLedger, program_id: Pubkey) -> Self {
        Self { ledger, program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Fetch one counter. A missing account is `Ok(None)`, not an error.
    pub async fn fetch_one(&self, address: &Pubkey) -> ClientResult<Option<CounterState>> {
        let Some(account) = self.ledger.get_account(address).await? else {
            debug!("Account {} not found", address);
            return Ok(None);
        };

        // A closed account can linger as an empty system-owned shell until it is purged
        if account.lamports == 0 && account.data.is_empty() {
            return Ok(None);
        }

        self.decode(address, &account).map(Some)
    }

    /// Fetch every counter owned by the program. Order is unspecified.
    pub async fn fetch_all(&self) -> ClientResult<Vec<KeyedCounter>> {
        let accounts = self
            .ledger
            .get_program_accounts(&self.program_id, &CounterState::discriminator())
            .await?;

        debug!("Fetched {} program accounts", accounts.len());

        accounts
            .iter()
            .map(|(address, account)| {
                self.decode(address, account).map(|state| KeyedCounter {
                    address: *address,
                    state,
                })
            })
            .collect()
    }

    /// Look up the program account itself; `None` when nothing is deployed there
    pub async fn program_account(&self) -> ClientResult<Option<ProgramAccountInfo>> {
        let account = self.ledger.get_account(&self.program_id).await?;
        Ok(account.map(|account| ProgramAccountInfo {
            executable: account.executable,
            owner: account.owner,
            lamports: account.lamports,
            data_len: account.data.len(),
        }))
    }

    fn decode(&self, address: &Pubkey, account: &Account) -> ClientResult<CounterState> {
        if account.owner != self.program_id {
            return Err(ClientError::Decoding {
                address: *address,
                reason: format!(
                    "owned by {}, expected program {}",
                    account.owner, self.program_id
                ),
            });
        }

        CounterState::try_from_account_data(&account.data).map_err(|e| ClientError::Decoding {
            address: *address,
            reason: e.to_string(),
        })
    }
}
