//! Behavior-driven tests for the market-data store.
//!
//! These tests verify HOW the store publishes loading, success and failure
//! states, and how overlapping refreshes are resolved.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coinwatch_core::{
    CoinGeckoSource, FetchError, HttpClient, HttpError, HttpRequest, HttpResponse,
    MarketDataSnapshot, MarketDataSource, MarketDataStore, MarketEntry, MarketQuery,
};
use tokio::sync::oneshot;

const BTC_RESPONSE: &str = r#"[{"id":"btc","symbol":"btc","name":"Bitcoin","image":"http://x/img.png","current_price":65000.5,"price_change_percentage_24h":-2.3,"market_cap":1.2e12}]"#;

const TWO_COINS_RESPONSE: &str = r#"[
    {"id":"bitcoin","symbol":"btc","name":"Bitcoin","image":"http://x/btc.png","current_price":65000.5,"price_change_percentage_24h":-2.3,"market_cap":1.2e12,"total_volume":3.1e10},
    {"id":"ethereum","symbol":"eth","name":"Ethereum","image":"http://x/eth.png","current_price":3120.25,"price_change_percentage_24h":4.75,"market_cap":3.75e11,"ath":4878.26}
]"#;

// =============================================================================
// Test doubles
// =============================================================================

/// Transport that replays a fixed sequence of outcomes, one per request.
struct SequenceHttpClient {
    outcomes: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
}

impl SequenceHttpClient {
    fn new(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

impl HttpClient for SequenceHttpClient {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let outcome = self
            .outcomes
            .lock()
            .expect("outcome queue lock")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::new("no scripted response left")));
        Box::pin(async move { outcome })
    }
}

type Outcome = Result<Vec<MarketEntry>, FetchError>;

/// Source whose fetches stay pending until the test releases them.
#[derive(Default)]
struct GatedSource {
    gates: Mutex<Vec<Option<oneshot::Sender<Outcome>>>>,
}

impl GatedSource {
    fn calls(&self) -> usize {
        self.gates.lock().expect("gate lock").len()
    }

    /// Complete call `index` (0-based). Returns false if that fetch is gone.
    fn release(&self, index: usize, outcome: Outcome) -> bool {
        let sender = self.gates.lock().expect("gate lock")[index]
            .take()
            .expect("gate released twice");
        sender.send(outcome).is_ok()
    }

    async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.calls() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("source was not called in time");
    }
}

impl MarketDataSource for GatedSource {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn fetch_markets<'a>(
        &'a self,
        _query: &'a MarketQuery,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + 'a>> {
        let (sender, receiver) = oneshot::channel();
        self.gates.lock().expect("gate lock").push(Some(sender));
        Box::pin(async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport(HttpError::new("gate dropped"))))
        })
    }
}

/// Source whose fetch crashes instead of returning.
struct PanickingSource;

impl MarketDataSource for PanickingSource {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn fetch_markets<'a>(
        &'a self,
        _query: &'a MarketQuery,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + 'a>> {
        panic!("decoder exploded")
    }
}

fn entry(id: &str, price: f64) -> MarketEntry {
    MarketEntry::new(id, id, id.to_uppercase(), "", price, 0.0, price * 1_000.0)
        .expect("valid entry")
}

fn ids(snapshot: &MarketDataSnapshot) -> Vec<&str> {
    snapshot.entries.iter().map(MarketEntry::id).collect()
}

fn coingecko(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Arc<dyn MarketDataSource> {
    Arc::new(CoinGeckoSource::with_http_client(Arc::new(
        SequenceHttpClient::new(outcomes),
    )))
}

// =============================================================================
// Scenarios against a mocked endpoint
// =============================================================================

#[tokio::test]
async fn when_endpoint_returns_one_coin_store_publishes_it() {
    // Given: an endpoint answering with a single bitcoin row
    let store = MarketDataStore::new(coingecko(vec![Ok(HttpResponse::ok_json(BTC_RESPONSE))]));

    // When: the initial load settles
    let snapshot = store.settled().await;

    // Then: the entry is published and the store is idle without error
    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].current_price(), 65000.5);
    assert_eq!(snapshot.entries[0].name(), "Bitcoin");
    assert!(!snapshot.is_loading);
    assert!(snapshot.error.is_none());
    assert!(snapshot.last_updated.is_some());
}

#[tokio::test]
async fn when_endpoint_returns_500_stale_entries_are_kept() {
    // Given: a store that already loaded two coins
    let store = MarketDataStore::new(coingecko(vec![
        Ok(HttpResponse::ok_json(TWO_COINS_RESPONSE)),
        Ok(HttpResponse::with_status(500, "internal error")),
    ]));
    let loaded = store.settled().await;
    assert_eq!(ids(&loaded), vec!["bitcoin", "ethereum"]);

    // When: the next refresh hits an HTTP 500
    store.refresh().finished().await;

    // Then: entries are unchanged and the failure is surfaced
    let snapshot = store.snapshot();
    assert_eq!(snapshot.entries, loaded.entries);
    assert_eq!(snapshot.last_updated, loaded.last_updated);
    assert!(!snapshot.is_loading);
    let error = snapshot.error.expect("error must be set");
    assert!(error.starts_with("Failed to load data: "), "{error}");
    assert!(error.contains("500"), "error should embed the cause: {error}");
}

#[tokio::test]
async fn when_response_is_malformed_error_is_set() {
    // Given: an endpoint returning truncated JSON
    let store = MarketDataStore::new(coingecko(vec![Ok(HttpResponse::ok_json("[{\"id\":"))]));

    // When: the load settles
    let snapshot = store.settled().await;

    // Then: the decode failure is reported and no entries appear
    assert!(snapshot.entries.is_empty());
    let error = snapshot.error.expect("error must be set");
    assert!(error.contains("malformed response"), "{error}");
}

#[tokio::test]
async fn when_transport_fails_error_embeds_cause() {
    // Given: no connectivity
    let store = MarketDataStore::new(coingecko(vec![Err(HttpError::new(
        "connection failed: network unreachable",
    ))]));

    // When: the load settles
    let snapshot = store.settled().await;

    // Then: the transport message is visible to the user
    let error = snapshot.error.expect("error must be set");
    assert!(error.contains("network unreachable"), "{error}");
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn a_new_refresh_clears_the_previous_error_and_recovers() {
    // Given: a store whose first load failed
    let store = MarketDataStore::new(coingecko(vec![
        Ok(HttpResponse::with_status(503, "")),
        Ok(HttpResponse::ok_json(BTC_RESPONSE)),
    ]));
    assert!(store.settled().await.error.is_some());

    // When: the user refreshes again
    let handle = store.refresh();

    // Then: the error is cleared immediately and data arrives on completion
    let during = store.snapshot();
    assert!(during.is_loading);
    assert!(during.error.is_none());

    handle.finished().await;
    let after = store.snapshot();
    assert_eq!(ids(&after), vec!["btc"]);
    assert!(after.error.is_none());
}

#[tokio::test]
async fn a_crashing_source_is_reported_as_unexpected_failure() {
    // Given: a source that panics while fetching
    let store = MarketDataStore::new(Arc::new(PanickingSource));

    // When: the load settles
    let snapshot = store.settled().await;

    // Then: the crash becomes an error state and loading ends
    assert!(!snapshot.is_loading);
    assert!(snapshot.entries.is_empty());
    let error = snapshot.error.expect("error must be set");
    assert!(
        error.starts_with("Failed to load data: unexpected failure"),
        "{error}"
    );

    // And: the store still accepts refreshes
    let handle = store.refresh();
    assert!(store.snapshot().is_loading);
    handle.finished().await;
    assert!(!store.snapshot().is_loading);
}

// =============================================================================
// Ordering and loading flag
// =============================================================================

#[tokio::test]
async fn loading_is_true_until_the_fetch_completes() {
    // Given: an idle store over a gated source
    let source = Arc::new(GatedSource::default());
    let store = MarketDataStore::idle(source.clone());
    let (initial, mut transitions) = store.transitions();
    assert!(!initial.is_loading);

    // When: a refresh is started but not yet answered
    let handle = store.refresh();
    source.wait_for_calls(1).await;

    // Then: observers see loading for as long as the fetch is pending
    assert!(store.snapshot().is_loading);
    assert!(store.observe().borrow().is_loading);

    // When: the fetch completes
    assert!(source.release(0, Ok(vec![entry("btc", 1.0), entry("eth", 2.0)])));
    handle.finished().await;

    // Then: exactly two snapshots were published, loading then settled
    let published = transitions.drain();
    assert_eq!(published.len(), 2);
    assert!(published[0].is_loading);
    assert!(!published[1].is_loading);
    assert_eq!(ids(&published[1]), vec!["btc", "eth"]);
}

#[tokio::test]
async fn entries_keep_server_order_and_duplicates() {
    // Given: a response with a repeated id
    let source = Arc::new(GatedSource::default());
    let store = MarketDataStore::idle(source.clone());

    // When: it is applied
    let handle = store.refresh();
    source.wait_for_calls(1).await;
    source.release(0, Ok(vec![entry("b", 1.0), entry("a", 2.0), entry("b", 3.0)]));
    handle.finished().await;

    // Then: nothing is sorted or deduplicated
    let snapshot = store.snapshot();
    assert_eq!(ids(&snapshot), vec!["b", "a", "b"]);
    assert_eq!(snapshot.entry("b").map(MarketEntry::current_price), Some(1.0));
}

#[tokio::test]
async fn superseded_refresh_never_overwrites_newer_result() {
    // Given: a store with an older fetch still pending
    let source = Arc::new(GatedSource::default());
    let store = MarketDataStore::idle(source.clone());
    let first = store.refresh();
    source.wait_for_calls(1).await;

    // When: a second refresh starts and finishes first
    let second = store.refresh();
    source.wait_for_calls(2).await;
    source.release(1, Ok(vec![entry("new", 2.0)]));
    second.finished().await;

    // And: the older fetch tries to deliver afterwards
    source.release(0, Ok(vec![entry("old", 1.0)]));
    first.finished().await;

    // Then: only the newest result is visible
    let snapshot = store.snapshot();
    assert_eq!(ids(&snapshot), vec!["new"]);
    assert!(!snapshot.is_loading);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn loading_stays_true_until_the_latest_refresh_settles() {
    // Given: two overlapping refreshes
    let source = Arc::new(GatedSource::default());
    let store = MarketDataStore::idle(source.clone());
    let first = store.refresh();
    source.wait_for_calls(1).await;
    let second = store.refresh();
    source.wait_for_calls(2).await;

    // When: the older one tries to complete
    source.release(0, Err(FetchError::Status { status: 502 }));
    first.finished().await;

    // Then: its outcome is ignored and the store is still loading
    let snapshot = store.snapshot();
    assert!(snapshot.is_loading);
    assert!(snapshot.error.is_none());
    assert!(snapshot.entries.is_empty());

    // When: the latest completes
    source.release(1, Ok(vec![entry("btc", 1.0)]));
    second.finished().await;

    // Then: the store settles on its result
    let snapshot = store.snapshot();
    assert!(!snapshot.is_loading);
    assert_eq!(ids(&snapshot), vec!["btc"]);
}
