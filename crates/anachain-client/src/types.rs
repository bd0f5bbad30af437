/*!
# Client Data Types

Values handed back to callers: confirmations, decoded accounts and cache queries.
*/

use anachain_sdk::{AnachainInstruction, Cluster, CounterState};
use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// Handle returned once a mutating transaction is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub signature: Signature,
    pub instruction: AnachainInstruction,
    /// The counter account the instruction targeted
    pub account: Pubkey,
    pub cluster: Cluster,
}

impl Confirmation {
    pub fn explorer_url(&self) -> String {
        format!(
            "https://explorer.solana.com/tx/{}{}",
            self.signature,
            self.cluster.explorer_query()
        )
    }
}

/// A counter account together with its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyedCounter {
    pub address: Pubkey,
    pub state: CounterState,
}

/// Summary of the program's own account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAccountInfo {
    pub executable: bool,
    pub owner: Pubkey,
    pub lamports: u64,
    pub data_len: usize,
}

/// What a cache entry holds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// Every counter account owned by the program
    All,
    /// One counter account
    Fetch(Pubkey),
    /// The program account itself
    ProgramAccount,
}

/// Cache key: the query scoped to the cluster it was made against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub cluster: Cluster,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    All(Vec<KeyedCounter>),
    Account(Option<CounterState>),
    ProgramAccount(Option<ProgramAccountInfo>),
}

impl QueryValue {
    pub fn into_all(self) -> Option<Vec<KeyedCounter>> {
        match self {
            QueryValue::All(accounts) => Some(accounts),
            _ => None,
        }
    }

    pub fn into_account(self) -> Option<Option<CounterState>> {
        match self {
            QueryValue::Account(state) => Some(state),
            _ => None,
        }
    }

    pub fn into_program_account(self) -> Option<Option<ProgramAccountInfo>> {
        match self {
            QueryValue::ProgramAccount(info) => Some(info),
            _ => None,
        }
    }
}
