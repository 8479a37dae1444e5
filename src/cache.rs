//! Keyed query cache: dedup, stale-while-revalidate, generation discipline.
//!
//! Keys are `resource name + canonical filter string`, so structurally equal
//! filters share one entry. Rules:
//! - a fresh entry is served without a request;
//! - a stale entry is served immediately while a background revalidation
//!   runs (stale-while-revalidate);
//! - concurrent fetches for one key collapse into a single in-flight
//!   request, with followers awaiting the leader's result;
//! - every fetch records the key's generation at start, and a resolution
//!   whose generation is no longer current is discarded — an older, slower
//!   response can never overwrite a newer one, and an invalidation mid-flight
//!   can never be papered over by a pre-invalidation response.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::ApiError;
use crate::types::FilterParams;

/// Cache key: resource name plus the canonical filter suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: String,
    suffix: String,
}

impl QueryKey {
    pub fn new(resource: &str, filter: &FilterParams) -> Self {
        Self {
            resource: resource.to_string(),
            suffix: filter.cache_suffix(),
        }
    }

    /// Key for an unfiltered query (`dashboard`, singleton fetches).
    pub fn bare(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            suffix: String::new(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.suffix.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}?{}", self.resource, self.suffix)
        }
    }
}

type FetchOutcome = Result<serde_json::Value, ApiError>;

#[derive(Default)]
struct Entry {
    data: Option<(serde_json::Value, Instant)>,
    /// Bumped on every invalidation; in-flight results from an older
    /// generation are discarded.
    generation: u64,
    inflight: Option<watch::Receiver<Option<FetchOutcome>>>,
}

/// Process-local query cache shared by one client context.
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    ttl: Duration,
}

/// Freshness window before a cached entry is revalidated in the background.
const DEFAULT_TTL: Duration = Duration::from_secs(30);

enum Plan {
    Fresh(serde_json::Value),
    Follow(watch::Receiver<Option<FetchOutcome>>),
    Lead {
        generation: u64,
        tx: watch::Sender<Option<FetchOutcome>>,
        stale: Option<serde_json::Value>,
    },
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Cached fetch. `fetcher` runs at most once per in-flight window per
    /// key; concurrent callers share its result.
    pub async fn fetch<T, F, Fut>(self: &Arc<Self>, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let plan = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key.clone()).or_default();

            match &entry.data {
                Some((value, fetched_at)) if fetched_at.elapsed() < self.ttl => {
                    Plan::Fresh(value.clone())
                }
                _ => {
                    if let Some(rx) = &entry.inflight {
                        Plan::Follow(rx.clone())
                    } else {
                        let (tx, rx) = watch::channel(None);
                        entry.inflight = Some(rx);
                        Plan::Lead {
                            generation: entry.generation,
                            tx,
                            stale: entry.data.as_ref().map(|(v, _)| v.clone()),
                        }
                    }
                }
            }
        };

        match plan {
            Plan::Fresh(value) => decode(value),
            Plan::Follow(mut rx) => {
                loop {
                    if let Some(outcome) = rx.borrow_and_update().clone() {
                        return outcome.and_then(decode);
                    }
                    rx.changed().await.map_err(|_| {
                        ApiError::Transport("request abandoned before completing".to_string())
                    })?;
                }
            }
            Plan::Lead {
                generation,
                tx,
                stale,
            } => {
                match stale {
                    Some(value) => {
                        // Serve the stale value now, revalidate in the
                        // background.
                        let cache = self.clone();
                        let key = key.clone();
                        tokio::spawn(async move {
                            let outcome = fetcher().await.and_then(encode);
                            cache.resolve(&key, generation, outcome.clone(), &tx);
                            if let Err(e) = outcome {
                                log::debug!("background revalidation of {} failed: {}", key, e);
                            }
                        });
                        decode(value)
                    }
                    None => {
                        let outcome = fetcher().await.and_then(encode);
                        self.resolve(&key, generation, outcome.clone(), &tx);
                        outcome.and_then(decode)
                    }
                }
            }
        }
    }

    /// Store a leader's outcome, unless the key moved on while the request
    /// was in flight. Followers always receive the outcome; only the cache
    /// write is conditional.
    fn resolve(
        &self,
        key: &QueryKey,
        generation: u64,
        outcome: FetchOutcome,
        tx: &watch::Sender<Option<FetchOutcome>>,
    ) {
        {
            let mut entries = self.entries.lock();
            if let Some(entry) = entries.get_mut(key) {
                if entry.generation == generation {
                    entry.inflight = None;
                    if let Ok(value) = &outcome {
                        entry.data = Some((value.clone(), Instant::now()));
                    }
                } else {
                    // An outdated leader must not wipe a newer leader's
                    // in-flight marker; invalidation already detached this
                    // flight from the entry.
                    log::debug!("discarding out-of-generation response for {}", key);
                }
            }
        }
        let _ = tx.send(Some(outcome));
    }

    /// Drop every cached entry for a resource (all filter variants) and bump
    /// generations so in-flight responses cannot repopulate them. The
    /// in-flight marker is detached too: a fetch issued after the
    /// invalidation must go back to the server, not adopt a pre-invalidation
    /// response from a request it never should have joined.
    pub fn invalidate(&self, resource: &str) {
        let mut entries = self.entries.lock();
        for (key, entry) in entries.iter_mut() {
            if key.resource == resource {
                entry.data = None;
                entry.generation += 1;
                entry.inflight = None;
            }
        }
    }

    /// Full reset, used at logout.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        for entry in entries.values_mut() {
            entry.data = None;
            entry.generation += 1;
            entry.inflight = None;
        }
    }

    /// Peek without fetching (tests, devtools).
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.lock();
        let (value, _) = entries.get(key)?.data.as_ref()?;
        serde_json::from_value(value.clone()).ok()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn encode<T: Serialize>(value: T) -> FetchOutcome {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(
        calls: Arc<AtomicUsize>,
        value: Vec<i64>,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<Vec<i64>, ApiError>> + Send>>
           + Send
           + 'static {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(value)
            })
                as std::pin::Pin<Box<dyn Future<Output = Result<Vec<i64>, ApiError>> + Send>>
        }
    }

    #[tokio::test]
    async fn concurrent_fetches_for_same_key_issue_one_request() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let key = QueryKey::new("leads", &FilterParams::for_lead(5));
        let f1 = cache.fetch::<Vec<i64>, _, _>(
            key.clone(),
            counting_fetcher(calls.clone(), vec![1, 2]),
        );
        let f2 = cache.fetch::<Vec<i64>, _, _>(
            key.clone(),
            counting_fetcher(calls.clone(), vec![9, 9]),
        );

        let (a, b) = tokio::join!(f1, f2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Both callers see the leader's data.
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[tokio::test]
    async fn fresh_entry_is_served_without_a_request() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::bare("contacts");

        let first = cache
            .fetch::<Vec<i64>, _, _>(key.clone(), counting_fetcher(calls.clone(), vec![1]))
            .await
            .unwrap();
        let second = cache
            .fetch::<Vec<i64>, _, _>(key.clone(), counting_fetcher(calls.clone(), vec![2]))
            .await
            .unwrap();

        assert_eq!(first, vec![1]);
        assert_eq!(second, vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_a_refetch() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::bare("leads");

        cache
            .fetch::<Vec<i64>, _, _>(key.clone(), counting_fetcher(calls.clone(), vec![1]))
            .await
            .unwrap();
        cache.invalidate("leads");

        let after = cache
            .fetch::<Vec<i64>, _, _>(key.clone(), counting_fetcher(calls.clone(), vec![2]))
            .await
            .unwrap();
        assert_eq!(after, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidating_one_resource_leaves_others_alone() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .fetch::<Vec<i64>, _, _>(QueryKey::bare("leads"), counting_fetcher(calls.clone(), vec![1]))
            .await
            .unwrap();
        cache
            .fetch::<Vec<i64>, _, _>(
                QueryKey::bare("contacts"),
                counting_fetcher(calls.clone(), vec![2]),
            )
            .await
            .unwrap();

        cache.invalidate("leads");

        // Contacts entry is still fresh; no new request.
        cache
            .fetch::<Vec<i64>, _, _>(
                QueryKey::bare("contacts"),
                counting_fetcher(calls.clone(), vec![3]),
            )
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn response_from_before_invalidation_is_discarded() {
        let cache = Arc::new(QueryCache::new());
        let key = QueryKey::bare("leads");
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        // Slow request begins before the invalidation...
        let slow = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .fetch::<Vec<i64>, _, _>(key, move || {
                        Box::pin(async move {
                            let _ = release_rx.await;
                            Ok(vec![111i64])
                        })
                            as std::pin::Pin<
                                Box<dyn Future<Output = Result<Vec<i64>, ApiError>> + Send>,
                            >
                    })
                    .await
            })
        };

        // ...a mutation invalidates the key mid-flight...
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.invalidate("leads");

        // ...then the slow response lands.
        release_tx.send(()).unwrap();
        let stale = slow.await.unwrap().unwrap();
        assert_eq!(stale, vec![111]);

        // The stale response must not have repopulated the cache.
        assert!(cache.peek::<Vec<i64>>(&key).is_none());
    }

    #[tokio::test]
    async fn fetch_after_invalidation_does_not_join_the_stale_flight() {
        let cache = Arc::new(QueryCache::new());
        let key = QueryKey::bare("leads");
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        // A pre-mutation request is still in flight...
        let slow = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .fetch::<Vec<i64>, _, _>(key, move || {
                        Box::pin(async move {
                            let _ = release_rx.await;
                            Ok(vec![111i64])
                        })
                            as std::pin::Pin<
                                Box<dyn Future<Output = Result<Vec<i64>, ApiError>> + Send>,
                            >
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // ...when a mutation invalidates the key. A fetch issued after the
        // mutation must start its own request and see post-mutation data.
        cache.invalidate("leads");
        let fresh = cache
            .fetch::<Vec<i64>, _, _>(key.clone(), || {
                Box::pin(async { Ok(vec![222i64]) })
                    as std::pin::Pin<Box<dyn Future<Output = Result<Vec<i64>, ApiError>> + Send>>
            })
            .await
            .unwrap();
        assert_eq!(fresh, vec![222]);

        // The old flight resolving late changes nothing.
        release_tx.send(()).unwrap();
        let stale = slow.await.unwrap().unwrap();
        assert_eq!(stale, vec![111]);
        assert_eq!(cache.peek::<Vec<i64>>(&key), Some(vec![222]));
    }

    #[tokio::test]
    async fn stale_entry_served_immediately_and_revalidated() {
        let cache = Arc::new(QueryCache::with_ttl(Duration::ZERO));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::bare("accounts");

        // Prime.
        cache
            .fetch::<Vec<i64>, _, _>(key.clone(), counting_fetcher(calls.clone(), vec![1]))
            .await
            .unwrap();

        // TTL zero: entry is immediately stale. The fetch returns the old
        // value without waiting and kicks off a background revalidation.
        let served = cache
            .fetch::<Vec<i64>, _, _>(key.clone(), counting_fetcher(calls.clone(), vec![2]))
            .await
            .unwrap();
        assert_eq!(served, vec![1]);

        // Let the background refresh land.
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.peek::<Vec<i64>>(&key), Some(vec![2]));
    }

    #[tokio::test]
    async fn error_outcomes_are_shared_with_followers_but_not_cached() {
        let cache = Arc::new(QueryCache::new());
        let key = QueryKey::bare("webhooks");

        let result = cache
            .fetch::<Vec<i64>, _, _>(key.clone(), || {
                Box::pin(async { Err(ApiError::Server { status: 500, message: "boom".into() }) })
                    as std::pin::Pin<Box<dyn Future<Output = Result<Vec<i64>, ApiError>> + Send>>
            })
            .await;
        assert!(result.is_err());
        assert!(cache.peek::<Vec<i64>>(&key).is_none());

        // A later fetch retries rather than serving the failure.
        let ok = cache
            .fetch::<Vec<i64>, _, _>(key.clone(), || {
                Box::pin(async { Ok(vec![5i64]) })
                    as std::pin::Pin<Box<dyn Future<Output = Result<Vec<i64>, ApiError>> + Send>>
            })
            .await
            .unwrap();
        assert_eq!(ok, vec![5]);
    }

    #[test]
    fn equivalent_filters_share_a_key() {
        let mut a = FilterParams::default();
        a.status = Some("new".into());
        a.page = Some(1);
        let mut b = FilterParams::default();
        b.page = Some(1);
        b.status = Some("new".into());

        assert_eq!(QueryKey::new("leads", &a), QueryKey::new("leads", &b));
        assert_ne!(
            QueryKey::new("leads", &a),
            QueryKey::new("contacts", &a)
        );
    }
}
