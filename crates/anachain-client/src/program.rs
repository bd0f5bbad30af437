/*!
# Program Binding

[`AnachainProgram`] is the typed handle for one cluster: it owns the reader,
the submitter and the query cache for that cluster and runs every mutation
through the same sequence:

1. mark `Fetch(account)` and `All` pending
2. submit and wait for confirmation
3. on success invalidate both keys (and, by default, wait for their refetch);
   on failure restore them untouched

[`ProgramRegistry`] hands out handles per cluster and drops them when the
active cluster changes.
*/

use crate::{
    account::AnachainAccount,
    cache::{Entry, QueryCache},
    config::ClientConfig,
    errors::{ClientError, ClientResult},
    ledger::{RpcLedger, SharedLedger},
    notify::{Notifier, TracingNotifier},
    reader::AccountReader,
    submitter::{SharedSigner, TransactionSubmitter},
    types::{Confirmation, KeyedCounter, ProgramAccountInfo, Query, QueryKey, QueryValue},
};
use anachain_sdk::{
    deployed_program_id, program_id_for, AnachainInstruction, Cluster, CounterState,
    ANACHAIN_PROGRAM_ID,
};
use futures::FutureExt;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::watch;
use tracing::{debug, warn};

pub type ProgramCache = QueryCache<QueryKey, QueryValue>;

/// Typed handle to the Anachain program on one cluster
pub struct AnachainProgram {
    cluster: Cluster,
    program_id: Pubkey,
    submitter: TransactionSubmitter,
    cache: ProgramCache,
    notifier: Arc<dyn Notifier>,
    config: ClientConfig,
}

impl AnachainProgram {
    pub fn new(
        cluster: Cluster,
        ledger: SharedLedger,
        payer: SharedSigner,
        config: ClientConfig,
    ) -> Self {
        Self::with_notifier(cluster, ledger, payer, config, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(
        cluster: Cluster,
        ledger: SharedLedger,
        payer: SharedSigner,
        config: ClientConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let program_id = config.program_id_override.unwrap_or_else(|| {
            if deployed_program_id(&cluster).is_none() {
                warn!(
                    "No program id configured for {}; using placeholder {}",
                    cluster, ANACHAIN_PROGRAM_ID
                );
            }
            program_id_for(&cluster)
        });

        debug!("Binding Anachain program {} on {}", program_id, cluster);

        let reader = AccountReader::new(ledger.clone(), program_id);
        let submitter = TransactionSubmitter::new(ledger, payer, program_id);

        Self {
            cluster,
            program_id,
            submitter,
            cache: query_cache(reader),
            notifier,
            config,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn payer_pubkey(&self) -> Pubkey {
        self.submitter.payer_pubkey()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Direct access to the query cache (for front-ends that manage keys themselves)
    pub fn cache(&self) -> &ProgramCache {
        &self.cache
    }

    pub fn key(&self, query: Query) -> QueryKey {
        QueryKey {
            cluster: self.cluster.clone(),
            query,
        }
    }

    /// Handle for one counter account
    pub fn account(self: &Arc<Self>, address: Pubkey) -> AnachainAccount {
        AnachainAccount::new(self.clone(), address)
    }

    /// Cached list of all counters. Never waits.
    pub fn accounts(&self) -> Entry<Vec<KeyedCounter>> {
        self.cache
            .read(&self.key(Query::All))
            .filter_map(QueryValue::into_all)
    }

    pub fn subscribe_accounts(&self) -> watch::Receiver<Entry<QueryValue>> {
        self.cache.subscribe(&self.key(Query::All))
    }

    /// Every counter owned by the program, served from the cache when fresh
    pub async fn fetch_all(&self) -> ClientResult<Vec<KeyedCounter>> {
        let key = self.key(Query::All);
        let value = self.cache.fetch(&key).await?;
        value.into_all().ok_or_else(|| mismatch(&key))
    }

    /// Like [`Self::fetch_all`] but always goes to the ledger
    pub async fn refetch_all(&self) -> ClientResult<Vec<KeyedCounter>> {
        let key = self.key(Query::All);
        let value = self.cache.refetch(&key).await?;
        value.into_all().ok_or_else(|| mismatch(&key))
    }

    /// The program's own account, `None` when nothing is deployed at the program id
    pub async fn program_account(&self) -> ClientResult<Option<ProgramAccountInfo>> {
        let key = self.key(Query::ProgramAccount);
        let value = self.cache.fetch(&key).await?;
        value.into_program_account().ok_or_else(|| mismatch(&key))
    }

    /// Create a counter at `account`'s address. The keypair co-signs and must be new.
    pub async fn initialize(&self, account: &Keypair) -> ClientResult<Confirmation> {
        self.mutate(AnachainInstruction::Initialize, account.pubkey(), Some(account))
            .await
    }

    pub(crate) async fn fetch_account(&self, address: Pubkey) -> ClientResult<Option<CounterState>> {
        let key = self.key(Query::Fetch(address));
        let value = self.cache.fetch(&key).await?;
        value.into_account().ok_or_else(|| mismatch(&key))
    }

    pub(crate) async fn refetch_account(
        &self,
        address: Pubkey,
    ) -> ClientResult<Option<CounterState>> {
        let key = self.key(Query::Fetch(address));
        let value = self.cache.refetch(&key).await?;
        value.into_account().ok_or_else(|| mismatch(&key))
    }

    pub(crate) async fn mutate(
        &self,
        instruction: AnachainInstruction,
        account: Pubkey,
        co_signer: Option<&Keypair>,
    ) -> ClientResult<Confirmation> {
        // Every mutation invalidates the same pair, membership-changing or not
        let account_key = self.key(Query::Fetch(account));
        let keys = vec![account_key.clone(), self.key(Query::All)];
        let guard = self.cache.begin_mutation(keys.clone());

        match self.submitter.submit(&instruction, &account, co_signer).await {
            Ok(signature) => {
                guard.commit();

                let confirmation = Confirmation {
                    signature,
                    instruction,
                    account,
                    cluster: self.cluster.clone(),
                };
                self.notifier.transaction_confirmed(&confirmation);

                if self.config.await_refetch {
                    for key in &keys {
                        // The error stays on the entry; the transaction itself succeeded
                        if let Err(e) = self.cache.fetch(key).await {
                            warn!(
                                "Refetch of {:?} after {} failed: {}",
                                key.query, instruction, e
                            );
                        }
                    }
                }

                // A closed account's entry is dropped once nobody watches it
                if matches!(confirmation.instruction, AnachainInstruction::Close) {
                    self.cache.evict(&account_key);
                }

                Ok(confirmation)
            }
            Err(error) => {
                guard.abort();
                self.notifier
                    .transaction_failed(&instruction, &account, &error);
                Err(error)
            }
        }
    }
}

fn query_cache(reader: AccountReader) -> ProgramCache {
    QueryCache::new(move |key: QueryKey| {
        let reader = reader.clone();
        async move {
            match key.query {
                Query::All => reader.fetch_all().await.map(QueryValue::All),
                Query::Fetch(address) => reader.fetch_one(&address).await.map(QueryValue::Account),
                Query::ProgramAccount => reader
                    .program_account()
                    .await
                    .map(QueryValue::ProgramAccount),
            }
        }
        .boxed()
    })
}

fn mismatch(key: &QueryKey) -> ClientError {
    ClientError::CacheMismatch(format!("{:?} on {}", key.query, key.cluster))
}

/// Opens a ledger connection for a cluster
pub type LedgerConnector = Arc<dyn Fn(&Cluster) -> ClientResult<SharedLedger> + Send + Sync>;

#[derive(Default)]
struct RegistryState {
    active: Option<Cluster>,
    handles: HashMap<Cluster, Arc<AnachainProgram>>,
}

/// Program handles keyed by cluster.
///
/// Only handles for the active cluster are kept: selecting another cluster
/// drops them together with their caches.
pub struct ProgramRegistry {
    connector: LedgerConnector,
    payer: SharedSigner,
    config: ClientConfig,
    notifier: Arc<dyn Notifier>,
    state: Mutex<RegistryState>,
}

impl ProgramRegistry {
    pub fn new<F>(connector: F, payer: SharedSigner, config: ClientConfig) -> Self
    where
        F: Fn(&Cluster) -> ClientResult<SharedLedger> + Send + Sync + 'static,
    {
        Self {
            connector: Arc::new(connector),
            payer,
            config,
            notifier: Arc::new(TracingNotifier),
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Registry connecting to each cluster's public RPC endpoint
    pub fn rpc(payer: SharedSigner, config: ClientConfig) -> Self {
        let commitment = config.commitment;
        Self::new(
            move |cluster: &Cluster| -> ClientResult<SharedLedger> {
                Ok(Arc::new(RpcLedger::new(cluster.rpc_url(), commitment)))
            },
            payer,
            config,
        )
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Handle for `cluster`, making it the active cluster
    pub fn select(&self, cluster: &Cluster) -> ClientResult<Arc<AnachainProgram>> {
        let mut state = self.state();

        if state.active.as_ref() != Some(cluster) {
            if let Some(previous) = state.active.take() {
                debug!("Switching cluster {} -> {}", previous, cluster);
            }
            state.handles.clear();
            state.active = Some(cluster.clone());
        }

        if let Some(program) = state.handles.get(cluster) {
            return Ok(program.clone());
        }

        let ledger = (self.connector)(cluster)?;
        let program = Arc::new(AnachainProgram::with_notifier(
            cluster.clone(),
            ledger,
            self.payer.clone(),
            self.config.clone(),
            self.notifier.clone(),
        ));
        state.handles.insert(cluster.clone(), program.clone());

        Ok(program)
    }

    pub fn active(&self) -> Option<Cluster> {
        self.state().active.clone()
    }

    /// Forget the handle for `cluster`; the next `select` derives a new one
    pub fn invalidate(&self, cluster: &Cluster) {
        self.state().handles.remove(cluster);
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
