//! Observable store for the current page of market data.
//!
//! [`MarketDataStore::refresh`] publishes a loading state synchronously, then
//! fetches on a spawned task. Each call supersedes the previous one: the older
//! fetch is aborted, and should its result still arrive it is discarded, so
//! state always reflects the most recent request.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::data_source::{MarketDataSource, MarketQuery};
use crate::observable::{StateChannel, Transitions};
use crate::{MarketDataSnapshot, MarketEntry, UtcDateTime};

/// Prefix of every user-visible fetch failure.
pub const FETCH_ERROR_PREFIX: &str = "Failed to load data";

/// Owner of the market listing. Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct MarketDataStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    source: Arc<dyn MarketDataSource>,
    query: MarketQuery,
    state: StateChannel<MarketDataSnapshot>,
    in_flight: Mutex<InFlight>,
}

#[derive(Default)]
struct InFlight {
    generation: u64,
    fetch: Option<AbortHandle>,
}

impl MarketDataStore {
    /// Build the store and start the initial load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        let store = Self::idle(source);
        store.refresh();
        store
    }

    /// Build the store without loading anything.
    pub fn idle(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                source,
                query: MarketQuery::DEFAULT,
                state: StateChannel::new(MarketDataSnapshot::default()),
                in_flight: Mutex::new(InFlight::default()),
            }),
        }
    }

    /// Start a new fetch, superseding any fetch still in flight.
    ///
    /// The loading state is visible to observers before this returns. The
    /// returned handle may be awaited or dropped; dropping it does not cancel
    /// the fetch.
    pub fn refresh(&self) -> RefreshHandle {
        let mut in_flight = self.inner.lock_in_flight();
        in_flight.generation += 1;
        let generation = in_flight.generation;

        if let Some(previous) = in_flight.fetch.take() {
            debug!(generation, "superseding in-flight market fetch");
            previous.abort();
        }

        self.inner.state.publish(|snapshot| {
            snapshot.is_loading = true;
            snapshot.error = None;
        });

        let fetch_inner = Arc::clone(&self.inner);
        let fetch = tokio::spawn(async move {
            fetch_inner
                .source
                .fetch_markets(&fetch_inner.query)
                .await
                .map_err(|error| {
                    warn!(
                        source = fetch_inner.source.name(),
                        transport = error.is_transport(),
                        %error,
                        "market fetch failed"
                    );
                    error.to_string()
                })
        });
        in_flight.fetch = Some(fetch.abort_handle());
        drop(in_flight);

        let apply_inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            match fetch.await {
                Ok(outcome) => apply_inner.apply(generation, outcome),
                Err(error) if error.is_cancelled() => {
                    debug!(generation, "market fetch cancelled");
                }
                Err(error) => {
                    apply_inner.apply(generation, Err(format!("unexpected failure: {error}")));
                }
            }
        });

        RefreshHandle { generation, task }
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> MarketDataSnapshot {
        self.inner.state.current()
    }

    /// Receiver that always holds the latest snapshot.
    pub fn observe(&self) -> watch::Receiver<MarketDataSnapshot> {
        self.inner.state.watch()
    }

    /// Current snapshot plus every snapshot published after it, in order.
    pub fn transitions(&self) -> (MarketDataSnapshot, Transitions<MarketDataSnapshot>) {
        self.inner.state.transitions()
    }

    /// Wait until no fetch is in flight and return that snapshot.
    pub async fn settled(&self) -> MarketDataSnapshot {
        let mut receiver = self.observe();
        let settled = match receiver.wait_for(|snapshot| !snapshot.is_loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }
}

impl StoreInner {
    fn lock_in_flight(&self) -> MutexGuard<'_, InFlight> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, generation: u64, outcome: Result<Vec<MarketEntry>, String>) {
        let mut in_flight = self.lock_in_flight();
        if in_flight.generation != generation {
            debug!(
                generation,
                current = in_flight.generation,
                "discarding superseded market fetch result"
            );
            return;
        }
        in_flight.fetch = None;

        self.state.publish(|snapshot| {
            match outcome {
                Ok(entries) => {
                    info!(count = entries.len(), "market listing refreshed");
                    snapshot.entries = entries;
                    snapshot.error = None;
                    snapshot.last_updated = Some(UtcDateTime::now());
                }
                Err(cause) => {
                    snapshot.error = Some(format!("{FETCH_ERROR_PREFIX}: {cause}"));
                }
            }
            snapshot.is_loading = false;
        });
    }
}

/// Handle to one `refresh()` call.
#[derive(Debug)]
pub struct RefreshHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Sequence number of the call; later calls have larger numbers.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait until this call's result has been applied or discarded.
    pub async fn finished(self) {
        if let Err(error) = self.task.await {
            warn!(generation = self.generation, %error, "refresh task ended abnormally");
        }
    }
}
