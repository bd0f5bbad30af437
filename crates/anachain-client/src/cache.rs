/*!
# Query Cache

Observable keyed mirror of ledger reads. Every key moves through

```text
Idle -> Pending -> Fresh | Failed
          ^  |
          +--+  invalidate / mutation in flight
```

Entries are only ever written by fetches the cache itself started. A fetch
result is applied only if no newer fetch was started for the same key in the
meantime (each fetch carries the key's generation), so once a caller has
observed an `invalidate` it can never be handed a value read before it.
Generations are drawn from one counter per cache, so this also holds across
[`QueryCache::evict`].

`read` and `subscribe` report a failed entry as-is; `fetch` reads it again.

Fetches run on the ambient Tokio runtime. Outside of one nothing is fetched:
keys are left idle until a caller inside a runtime asks for them.
*/

use crate::errors::{ClientError, ClientResult};
use futures::future::BoxFuture;
use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Instant,
};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Produces the value for a key. Called once per fetch.
pub type Fetcher<K, V> = Arc<dyn Fn(K) -> BoxFuture<'static, ClientResult<V>> + Send + Sync>;

#[derive(Debug, Clone)]
pub enum EntryStatus {
    /// Never fetched, or the last outcome is unknown
    Idle,
    /// A fetch or a mutation touching this key is in flight
    Pending,
    Fresh,
    /// The last fetch failed; any previous value is kept
    Failed(ClientError),
}

/// Snapshot of one cache entry
#[derive(Debug, Clone)]
pub struct Entry<V> {
    pub value: Option<V>,
    pub status: EntryStatus,
    /// When `value` was fetched
    pub updated_at: Option<Instant>,
}

impl<V> Entry<V> {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, EntryStatus::Pending)
    }

    /// Anything but `Fresh` must not be trusted as current ledger state
    pub fn is_stale(&self) -> bool {
        !matches!(self.status, EntryStatus::Fresh)
    }

    pub fn filter_map<U>(self, f: impl FnOnce(V) -> Option<U>) -> Entry<U> {
        Entry {
            value: self.value.and_then(f),
            status: self.status,
            updated_at: self.updated_at,
        }
    }
}

struct Slot<V> {
    value: Option<V>,
    updated_at: Option<Instant>,
    /// Last settled outcome: Idle, Fresh or Failed
    outcome: EntryStatus,
    generation: u64,
    fetching: bool,
    mutations: usize,
    sender: watch::Sender<Entry<V>>,
}

impl<V: Clone> Slot<V> {
    fn new() -> Self {
        let (sender, _) = watch::channel(Entry {
            value: None,
            status: EntryStatus::Idle,
            updated_at: None,
        });

        Self {
            value: None,
            updated_at: None,
            outcome: EntryStatus::Idle,
            generation: 0,
            fetching: false,
            mutations: 0,
            sender,
        }
    }

    fn status(&self) -> EntryStatus {
        if self.fetching || self.mutations > 0 {
            EntryStatus::Pending
        } else {
            self.outcome.clone()
        }
    }

    fn snapshot(&self) -> Entry<V> {
        Entry {
            value: self.value.clone(),
            status: self.status(),
            updated_at: self.updated_at,
        }
    }

    fn publish(&self) {
        self.sender.send_replace(self.snapshot());
    }

    fn needs_fetch(&self, retry_failed: bool) -> bool {
        let settled = match self.outcome {
            EntryStatus::Idle => true,
            EntryStatus::Failed(_) => retry_failed,
            EntryStatus::Fresh | EntryStatus::Pending => false,
        };
        settled && !self.fetching && self.mutations == 0
    }

    fn start_fetch(&mut self, generation: u64) -> u64 {
        self.generation = generation;
        self.fetching = true;
        generation
    }

    /// Forget any in-flight fetch and fall back to idle
    fn reset(&mut self, generation: u64) {
        self.generation = generation;
        self.fetching = false;
        self.outcome = EntryStatus::Idle;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Commit,
    Abort,
    Unknown,
}

struct Inner<K, V> {
    slots: Mutex<HashMap<K, Slot<V>>>,
    fetcher: Fetcher<K, V>,
    generations: AtomicU64,
}

/// Keyed, observable cache of ledger reads
pub struct QueryCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new<F>(fetcher: F) -> Self
    where
        F: Fn(K) -> BoxFuture<'static, ClientResult<V>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                slots: Mutex::new(HashMap::new()),
                fetcher: Arc::new(fetcher),
                generations: AtomicU64::new(0),
            }),
        }
    }

    /// Current entry for `key`. Never waits; starts a background fetch the
    /// first time a key is seen.
    pub fn read(&self, key: &K) -> Entry<V> {
        let (entry, generation) = {
            let mut slots = self.slots();
            let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
            let generation = self.start_fetch_if_needed(slot, false);
            (slot.snapshot(), generation)
        };

        if let Some(generation) = generation {
            self.spawn_fetch(key.clone(), generation);
        }
        entry
    }

    /// Watch an entry. Starts a background fetch the first time a key is seen.
    pub fn subscribe(&self, key: &K) -> watch::Receiver<Entry<V>> {
        let (receiver, generation) = {
            let mut slots = self.slots();
            let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
            let generation = self.start_fetch_if_needed(slot, false);
            (slot.sender.subscribe(), generation)
        };

        if let Some(generation) = generation {
            self.spawn_fetch(key.clone(), generation);
        }
        receiver
    }

    /// Mark `key` pending and refetch it. Any fetch already in flight for the
    /// key is superseded and its result dropped.
    pub fn invalidate(&self, key: &K) {
        let can_fetch = can_spawn();
        let generation = {
            let mut slots = self.slots();
            let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
            let generation = self.next_generation();
            if can_fetch {
                slot.start_fetch(generation);
            } else {
                slot.reset(generation);
            }
            slot.publish();
            generation
        };

        if can_fetch {
            self.spawn_fetch(key.clone(), generation);
        }
    }

    /// Value for `key`, waiting while the entry is pending.
    ///
    /// A fresh entry is returned as-is. An idle or failed one is fetched
    /// first, and the error of that fetch is returned if it fails too.
    pub async fn fetch(&self, key: &K) -> ClientResult<V> {
        let mut retry_failed = true;
        loop {
            let (mut receiver, generation) = {
                let mut slots = self.slots();
                let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
                let generation = self.start_fetch_if_needed(slot, retry_failed);
                (slot.sender.subscribe(), generation)
            };
            // a failure observed from here on is the answer
            retry_failed = false;

            if let Some(generation) = generation {
                self.spawn_fetch(key.clone(), generation);
            }

            let entry = match receiver.wait_for(|entry| !entry.is_pending()).await {
                Ok(entry) => entry.clone(),
                // slot was dropped underneath us; start over with a new one
                Err(_) => continue,
            };

            match entry.status {
                EntryStatus::Fresh => {
                    return entry.value.ok_or_else(|| {
                        ClientError::CacheMismatch(format!("{key:?} is fresh but empty"))
                    });
                }
                EntryStatus::Failed(error) => return Err(error),
                EntryStatus::Idle if !can_spawn() => {
                    return Err(ClientError::InvalidConfig(format!(
                        "cannot fetch {key:?} outside a Tokio runtime"
                    )));
                }
                // an aborted mutation on a never-fetched key leaves it idle
                EntryStatus::Idle | EntryStatus::Pending => continue,
            }
        }
    }

    /// Invalidate `key` and wait for the new value
    pub async fn refetch(&self, key: &K) -> ClientResult<V> {
        self.invalidate(key);
        self.fetch(key).await
    }

    /// Mark `keys` pending for the duration of a mutation.
    ///
    /// The guard must be resolved with [`MutationGuard::commit`] once the
    /// mutation is confirmed or [`MutationGuard::abort`] if it failed.
    pub fn begin_mutation(&self, keys: Vec<K>) -> MutationGuard<K, V> {
        {
            let mut slots = self.slots();
            for key in &keys {
                let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
                slot.mutations += 1;
                slot.publish();
            }
        }

        MutationGuard {
            cache: self.clone(),
            keys,
            resolved: false,
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
        self.inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop `key`'s entry if nothing observes it and nothing is in flight.
    /// Returns whether it was removed.
    pub fn evict(&self, key: &K) -> bool {
        let mut slots = self.slots();
        let idle = slots.get(key).is_some_and(|slot| {
            !slot.fetching && slot.mutations == 0 && slot.sender.receiver_count() == 0
        });
        if idle {
            debug!("Evicting {:?}", key);
            slots.remove(key);
        }
        idle
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_generation(&self) -> u64 {
        self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn start_fetch_if_needed(&self, slot: &mut Slot<V>, retry_failed: bool) -> Option<u64> {
        if !slot.needs_fetch(retry_failed) || !can_spawn() {
            return None;
        }
        let generation = slot.start_fetch(self.next_generation());
        slot.publish();
        Some(generation)
    }

    fn spawn_fetch(&self, key: K, generation: u64) {
        let cache = self.clone();
        let fetch = (self.inner.fetcher)(key.clone());

        tokio::spawn(async move {
            let result = fetch.await;
            cache.complete_fetch(&key, generation, result);
        });
    }

    fn complete_fetch(&self, key: &K, generation: u64, result: ClientResult<V>) {
        let mut slots = self.slots();
        let Some(slot) = slots.get_mut(key) else {
            return;
        };

        if slot.generation != generation {
            debug!(
                "Dropping superseded fetch for {:?} (generation {} < {})",
                key, generation, slot.generation
            );
            return;
        }

        slot.fetching = false;
        match result {
            Ok(value) => {
                slot.value = Some(value);
                slot.updated_at = Some(Instant::now());
                slot.outcome = EntryStatus::Fresh;
            }
            Err(error) => {
                warn!("Fetch failed for {:?}: {}", key, error);
                slot.outcome = EntryStatus::Failed(error);
            }
        }
        slot.publish();
    }

    fn finish_mutation(&self, keys: &[K], resolution: Resolution) {
        // Without a runtime we cannot refetch, so an unknown outcome just
        // forgets that the value was fresh
        let can_refetch = can_spawn();

        let mut scheduled = Vec::new();
        {
            let mut slots = self.slots();
            for key in keys {
                let Some(slot) = slots.get_mut(key) else {
                    continue;
                };
                slot.mutations = slot.mutations.saturating_sub(1);

                match resolution {
                    Resolution::Abort => {}
                    Resolution::Commit | Resolution::Unknown if can_refetch => {
                        let generation = slot.start_fetch(self.next_generation());
                        scheduled.push((key.clone(), generation));
                    }
                    Resolution::Commit | Resolution::Unknown => {
                        slot.reset(self.next_generation());
                    }
                }
                slot.publish();
            }
        }

        for (key, generation) in scheduled {
            self.spawn_fetch(key, generation);
        }
    }
}

fn can_spawn() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}

/// Keeps a set of cache keys pending while a mutation is in flight.
///
/// Dropping an unresolved guard (the caller stopped awaiting) invalidates the
/// keys, since the transaction may still land.
#[must_use = "resolve the guard with commit() or abort()"]
pub struct MutationGuard<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    cache: QueryCache<K, V>,
    keys: Vec<K>,
    resolved: bool,
}

impl<K, V> MutationGuard<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The mutation is confirmed: invalidate and refetch every key
    pub fn commit(mut self) {
        self.resolve(Resolution::Commit);
    }

    /// The mutation failed: restore every key to its pre-mutation status
    pub fn abort(mut self) {
        self.resolve(Resolution::Abort);
    }

    fn resolve(&mut self, resolution: Resolution) {
        if self.resolved {
            return;
        }
        self.resolved = true;
        self.cache.finish_mutation(&self.keys, resolution);
    }
}

impl<K, V> Drop for MutationGuard<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.resolve(Resolution::Unknown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt as _;
    use std::{
        collections::VecDeque,
        sync::atomic::{AtomicBool, AtomicU64, Ordering},
    };
    use tokio::sync::oneshot;

    /// Every fetch returns the number of fetches started so far
    fn counting_cache() -> (QueryCache<u32, u64>, Arc<AtomicU64>) {
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();
        let cache = QueryCache::new(move |_key: u32| {
            let value = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(value) }.boxed()
        });
        (cache, calls)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_read_starts_background_fetch() {
        let (cache, calls) = counting_cache();

        let entry = cache.read(&1);
        assert!(entry.is_pending());
        assert!(entry.value.is_none());

        assert_eq!(cache.fetch(&1).await.unwrap(), 1);

        let entry = cache.read(&1);
        assert!(!entry.is_stale());
        assert_eq!(entry.value, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_refetch() {
        let (cache, calls) = counting_cache();

        cache.fetch(&1).await.unwrap();
        cache.fetch(&1).await.unwrap();
        cache.read(&1);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let (cache, calls) = counting_cache();

        assert_eq!(cache.fetch(&1).await.unwrap(), 1);
        cache.invalidate(&1);
        assert!(cache.read(&1).is_pending());
        assert_eq!(cache.fetch(&1).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (cache, _) = counting_cache();

        cache.fetch(&1).await.unwrap();
        cache.fetch(&2).await.unwrap();
        cache.invalidate(&1);

        assert!(cache.read(&1).is_pending());
        assert!(!cache.read(&2).is_stale());
    }

    #[tokio::test]
    async fn test_abort_restores_previous_state() {
        let (cache, calls) = counting_cache();
        cache.fetch(&1).await.unwrap();

        let guard = cache.begin_mutation(vec![1]);
        let entry = cache.read(&1);
        assert!(entry.is_pending());
        assert_eq!(entry.value, Some(1));

        guard.abort();
        settle().await;

        let entry = cache.read(&1);
        assert!(!entry.is_stale());
        assert_eq!(entry.value, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_refetches() {
        let (cache, calls) = counting_cache();
        cache.fetch(&1).await.unwrap();

        let guard = cache.begin_mutation(vec![1, 2]);
        guard.commit();

        assert_eq!(cache.fetch(&1).await.unwrap(), 2);
        cache.fetch(&2).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_dropped_guard_invalidates() {
        let (cache, _) = counting_cache();
        cache.fetch(&1).await.unwrap();

        let guard = cache.begin_mutation(vec![1]);
        drop(guard);

        assert!(cache.read(&1).is_pending());
        assert_eq!(cache.fetch(&1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_waits_for_pending_mutation() {
        let (cache, _) = counting_cache();
        cache.fetch(&1).await.unwrap();

        let guard = cache.begin_mutation(vec![1]);

        let waiter = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.fetch(&1).await })
        };
        settle().await;
        assert!(!waiter.is_finished());

        guard.commit();
        assert_eq!(waiter.await.unwrap().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_aborted_mutation_on_unfetched_key_is_fetched_on_demand() {
        let (cache, _) = counting_cache();

        let guard = cache.begin_mutation(vec![7]);
        assert!(cache.read(&7).value.is_none());
        guard.abort();

        assert!(matches!(cache.read(&7).status, EntryStatus::Pending | EntryStatus::Idle));
        assert_eq!(cache.fetch(&7).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_superseded_fetch_is_discarded() {
        let senders: Arc<Mutex<VecDeque<oneshot::Sender<u64>>>> = Arc::default();
        let queue = senders.clone();
        let cache: QueryCache<u32, u64> = QueryCache::new(move |_key| {
            let (tx, rx) = oneshot::channel();
            queue.lock().unwrap().push_back(tx);
            async move { rx.await.map_err(|_| ClientError::Transport("dropped".to_string())) }
                .boxed()
        });

        cache.read(&1);
        cache.invalidate(&1);

        let (first, second) = {
            let mut senders = senders.lock().unwrap();
            (senders.pop_front().unwrap(), senders.pop_front().unwrap())
        };

        second.send(2).unwrap();
        assert_eq!(cache.fetch(&1).await.unwrap(), 2);

        // The older fetch finishing late must not overwrite the newer value
        first.send(1).unwrap();
        settle().await;
        assert_eq!(cache.read(&1).value, Some(2));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_value() {
        let failing = Arc::new(AtomicBool::new(false));
        let flag = failing.clone();
        let cache: QueryCache<u32, u64> = QueryCache::new(move |_key| {
            let fail = flag.load(Ordering::SeqCst);
            async move {
                if fail {
                    Err(ClientError::Transport("connection refused".to_string()))
                } else {
                    Ok(10)
                }
            }
            .boxed()
        });

        assert_eq!(cache.fetch(&1).await.unwrap(), 10);

        failing.store(true, Ordering::SeqCst);
        let err = cache.refetch(&1).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));

        let entry = cache.read(&1);
        assert!(matches!(entry.status, EntryStatus::Failed(_)));
        assert!(entry.is_stale());
        assert_eq!(entry.value, Some(10));
    }

    #[tokio::test]
    async fn test_fetch_retries_failed_entry() {
        let failing = Arc::new(AtomicBool::new(true));
        let (cache, calls) = {
            let calls = Arc::new(AtomicU64::new(0));
            let (flag, counter) = (failing.clone(), calls.clone());
            let cache: QueryCache<u32, u64> = QueryCache::new(move |_key| {
                counter.fetch_add(1, Ordering::SeqCst);
                let fail = flag.load(Ordering::SeqCst);
                async move {
                    if fail {
                        Err(ClientError::Transport("connection refused".to_string()))
                    } else {
                        Ok(10)
                    }
                }
                .boxed()
            });
            (cache, calls)
        };

        assert!(cache.fetch(&1).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // read reports the failure without going back to the ledger
        assert!(matches!(cache.read(&1).status, EntryStatus::Failed(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // a still-failing retry is attempted once and reported
        assert!(cache.fetch(&1).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        failing.store(false, Ordering::SeqCst);
        assert_eq!(cache.fetch(&1).await.unwrap(), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!cache.read(&1).is_stale());
    }

    #[tokio::test]
    async fn test_overlapping_mutations_keep_key_pending() {
        let (cache, calls) = counting_cache();
        cache.fetch(&1).await.unwrap();

        let first = cache.begin_mutation(vec![1]);
        let second = cache.begin_mutation(vec![1]);

        first.commit();
        settle().await;
        assert!(cache.read(&1).is_pending());

        second.abort();
        // the first mutation's refetch is the only one
        assert_eq!(cache.fetch(&1).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_evict_only_unobserved_entries() {
        let (cache, calls) = counting_cache();
        cache.fetch(&1).await.unwrap();

        let receiver = cache.subscribe(&1);
        assert!(!cache.evict(&1));

        drop(receiver);
        assert!(cache.evict(&1));
        assert!(cache.is_empty());

        let guard = cache.begin_mutation(vec![2]);
        assert!(!cache.evict(&2));
        guard.abort();

        // an evicted key starts over
        assert!(cache.read(&1).is_pending());
        assert_eq!(cache.fetch(&1).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_late_fetch_is_discarded_after_evict() {
        let senders: Arc<Mutex<VecDeque<oneshot::Sender<u64>>>> = Arc::default();
        let queue = senders.clone();
        let cache: QueryCache<u32, u64> = QueryCache::new(move |_key| {
            let (tx, rx) = oneshot::channel();
            queue.lock().unwrap().push_back(tx);
            async move { rx.await.map_err(|_| ClientError::Transport("dropped".to_string())) }
                .boxed()
        });

        cache.read(&1);
        cache.invalidate(&1);
        let stale = senders.lock().unwrap().pop_front().unwrap();
        senders.lock().unwrap().pop_front().unwrap().send(5).unwrap();
        assert_eq!(cache.fetch(&1).await.unwrap(), 5);

        assert!(cache.evict(&1));
        cache.read(&1);
        stale.send(1).unwrap();
        settle().await;
        assert!(cache.read(&1).is_pending());

        senders.lock().unwrap().pop_front().unwrap().send(6).unwrap();
        assert_eq!(cache.fetch(&1).await.unwrap(), 6);
    }

    #[test]
    fn test_no_fetch_outside_runtime() {
        let (cache, calls) = counting_cache();

        let entry = cache.read(&1);
        assert!(matches!(entry.status, EntryStatus::Idle));
        let receiver = cache.subscribe(&1);
        cache.invalidate(&1);
        assert!(matches!(receiver.borrow().status, EntryStatus::Idle));
        drop(cache.begin_mutation(vec![1]));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        assert_eq!(runtime.block_on(cache.fetch(&1)).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let (cache, _) = counting_cache();

        let mut receiver = cache.subscribe(&1);
        let entry = receiver
            .wait_for(|entry| !entry.is_pending())
            .await
            .unwrap()
            .clone();
        assert_eq!(entry.value, Some(1));

        cache.invalidate(&1);
        let entry = receiver
            .wait_for(|entry| !entry.is_pending() && entry.value == Some(2))
            .await
            .unwrap()
            .clone();
        assert!(!entry.is_stale());
    }
}
