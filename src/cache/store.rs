// In-memory query cache.
// Tracks fetched data, fetch status, freshness, and in-flight requests per key.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::key::QueryKey;

/// Default freshness window for list results: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Fetch status of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Cached result for one query key.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub key: QueryKey,
    /// Last successful result.
    pub data: Option<T>,
    /// When `data` was received.
    pub cached_at: Option<DateTime<Utc>>,
    pub status: FetchStatus,
    /// A request for this key has been sent and not yet settled.
    pub in_flight: bool,
    /// Marked stale by a mutation; the next request re-fetches.
    pub invalidated: bool,
    /// Invalidated while in flight; the settled result is already out of date.
    pub refetch_on_settle: bool,
}

impl<T> CacheEntry<T> {
    fn new(key: QueryKey) -> Self {
        Self {
            key,
            data: None,
            cached_at: None,
            status: FetchStatus::Idle,
            in_flight: false,
            invalidated: false,
            refetch_on_settle: false,
        }
    }

    /// Check if the cached data is older than the freshness window.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let Some(cached_at) = self.cached_at else {
            return true;
        };

        let elapsed = Utc::now()
            .signed_duration_since(cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        elapsed > ttl
    }

    /// Check if a successful result can be served without a request.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.status == FetchStatus::Success
            && self.data.is_some()
            && !self.invalidated
            && !self.is_expired(ttl)
    }

    /// Whether a new request should be sent for this entry.
    pub fn needs_fetch(&self, ttl: Duration) -> bool {
        !self.in_flight && !self.is_fresh(ttl)
    }
}

/// Query cache keyed by serialized [`QueryKey`].
#[derive(Debug, Clone)]
pub struct QueryCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    ttl: Duration,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<T> QueryCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &QueryKey) -> Option<&CacheEntry<T>> {
        self.entries.get(&key.serialize())
    }

    /// Get the entry for a key, creating an idle one if missing.
    pub fn entry_mut(&mut self, key: &QueryKey) -> &mut CacheEntry<T> {
        self.entries
            .entry(key.serialize())
            .or_insert_with(|| CacheEntry::new(key.clone()))
    }

    /// Mark a key as in flight if it needs a request. Returns false when the
    /// cached data is fresh or a request is already outstanding.
    pub fn begin_fetch(&mut self, key: &QueryKey) -> bool {
        let ttl = self.ttl;
        let entry = self.entry_mut(key);
        if !entry.needs_fetch(ttl) {
            return false;
        }

        entry.in_flight = true;
        if entry.status != FetchStatus::Success {
            entry.status = FetchStatus::Loading;
        }
        true
    }

    /// Record the outcome of a request. Returns true when the entry was
    /// invalidated during the request and must be fetched again.
    pub fn settle(&mut self, key: &QueryKey, result: Result<T, String>) -> bool {
        let entry = self.entry_mut(key);
        entry.in_flight = false;

        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.cached_at = Some(Utc::now());
                entry.status = FetchStatus::Success;
                entry.invalidated = false;
            }
            Err(message) => {
                entry.status = FetchStatus::Error(message);
            }
        }

        if entry.refetch_on_settle {
            entry.refetch_on_settle = false;
            entry.invalidated = true;
            true
        } else {
            false
        }
    }

    /// Mark every entry in a namespace stale. Returns how many were marked.
    pub fn invalidate(&mut self, namespace: &str) -> usize {
        let mut count = 0;
        for entry in self.entries.values_mut() {
            if entry.key.in_namespace(namespace) {
                entry.invalidated = true;
                if entry.in_flight {
                    entry.refetch_on_settle = true;
                }
                count += 1;
            }
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
