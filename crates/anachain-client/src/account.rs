use crate::{
    cache::Entry,
    errors::ClientResult,
    program::AnachainProgram,
    types::{Confirmation, Query, QueryKey, QueryValue},
};
use anachain_sdk::{AnachainInstruction, CounterState};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tokio::sync::watch;

/// Operations scoped to one counter account.
///
/// Mutations return once the transaction is confirmed. By that point the
/// account's cache entry has been invalidated, so a following
/// [`fetch`](Self::fetch) never returns a value read before the confirmation.
#[derive(Clone)]
pub struct AnachainAccount {
    program: Arc<AnachainProgram>,
    address: Pubkey,
}

impl AnachainAccount {
    pub(crate) fn new(program: Arc<AnachainProgram>, address: Pubkey) -> Self {
        Self { program, address }
    }

    pub fn address(&self) -> &Pubkey {
        &self.address
    }

    pub fn program(&self) -> &Arc<AnachainProgram> {
        &self.program
    }

    pub fn key(&self) -> QueryKey {
        self.program.key(Query::Fetch(self.address))
    }

    /// Cached state without waiting. A fresh entry with no value means the
    /// account does not exist.
    pub fn snapshot(&self) -> Entry<CounterState> {
        self.program
            .cache()
            .read(&self.key())
            .filter_map(|value| value.into_account().flatten())
    }

    pub fn subscribe(&self) -> watch::Receiver<Entry<QueryValue>> {
        self.program.cache().subscribe(&self.key())
    }

    /// `Ok(None)` once the account is closed or before it is initialized
    pub async fn fetch(&self) -> ClientResult<Option<CounterState>> {
        self.program.fetch_account(self.address).await
    }

    pub async fn refetch(&self) -> ClientResult<Option<CounterState>> {
        self.program.refetch_account(self.address).await
    }

    pub async fn increment(&self) -> ClientResult<Confirmation> {
        self.program
            .mutate(AnachainInstruction::Increment, self.address, None)
            .await
    }

    pub async fn decrement(&self) -> ClientResult<Confirmation> {
        self.program
            .mutate(AnachainInstruction::Decrement, self.address, None)
            .await
    }

    /// Values the program does not accept come back as a rejected transaction
    pub async fn set(&self, value: u8) -> ClientResult<Confirmation> {
        self.program
            .mutate(AnachainInstruction::Set { value }, self.address, None)
            .await
    }

    /// Close the account; its rent goes back to the payer
    pub async fn close(&self) -> ClientResult<Confirmation> {
        self.program
            .mutate(AnachainInstruction::Close, self.address, None)
            .await
    }
}
