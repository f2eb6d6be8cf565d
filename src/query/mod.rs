// Query layer over the notes cache.
// Decides when to fetch, applies results by key, and derives what the list view shows.

#![allow(dead_code)]

pub mod mutation;

use std::time::Duration;

use log::{debug, info};

use crate::cache::{FetchStatus, NOTES_NAMESPACE, QueryCache, QueryKey};
use crate::error::Result;
use crate::notehub::{FetchNotesParams, FetchNotesResponse, Note, NotesApi};

pub use mutation::MutationState;

/// What the list area should display. Exactly one state applies at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryView<'a> {
    /// Nothing to show yet.
    Loading,
    /// The active query failed.
    Error(&'a str),
    /// The query succeeded with no notes.
    Empty { searching: bool },
    /// Notes to render. `placeholder` means they belong to a previous query.
    Ready {
        notes: &'a [Note],
        total_pages: u32,
        placeholder: bool,
        fetching: bool,
    },
}

/// Active list query plus the cache behind it.
#[derive(Debug)]
pub struct QueryClient {
    cache: QueryCache<FetchNotesResponse>,
    params: FetchNotesParams,
    active: QueryKey,
    /// Last key with data, shown while the active key loads.
    placeholder: Option<QueryKey>,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        let params = FetchNotesParams::default();
        Self {
            cache: QueryCache::new(stale_time),
            active: QueryKey::notes(&params),
            params,
            placeholder: None,
        }
    }

    pub fn params(&self) -> &FetchNotesParams {
        &self.params
    }

    pub fn active_key(&self) -> &QueryKey {
        &self.active
    }

    pub fn cache(&self) -> &QueryCache<FetchNotesResponse> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut QueryCache<FetchNotesResponse> {
        &mut self.cache
    }

    /// Make `params` the active query. Returns the key to fetch, if any.
    pub fn set_params(&mut self, params: FetchNotesParams) -> Option<QueryKey> {
        let key = QueryKey::notes(&params);
        if key != self.active {
            let has_data = self
                .cache
                .get(&self.active)
                .is_some_and(|entry| entry.data.is_some());
            if has_data {
                self.placeholder = Some(self.active.clone());
            }
            debug!("active query {} -> {}", self.active, key);
        }
        self.params = params;
        self.active = key;
        self.request_active()
    }

    /// Re-request the active query regardless of freshness.
    pub fn refresh(&mut self) -> Option<QueryKey> {
        let entry = self.cache.entry_mut(&self.active);
        entry.invalidated = true;
        if entry.in_flight {
            entry.refetch_on_settle = true;
        }
        self.request_active()
    }

    fn request_active(&mut self) -> Option<QueryKey> {
        if self.cache.begin_fetch(&self.active) {
            Some(self.active.clone())
        } else {
            None
        }
    }

    /// Store a fetch result under its own key. Late results for other keys
    /// never change the active view. Returns a key to fetch again, if any.
    pub fn settle(
        &mut self,
        key: &QueryKey,
        result: Result<FetchNotesResponse>,
    ) -> Option<QueryKey> {
        let is_active = *key == self.active;
        match &result {
            Ok(data) => debug!(
                "{} settled: {} notes, {} pages{}",
                key,
                data.notes.len(),
                data.total_pages,
                if is_active { "" } else { " (inactive)" }
            ),
            Err(e) => info!("{} failed: {}", key, e),
        }

        let refetch = self.cache.settle(key, result.map_err(|e| e.to_string()));
        if refetch && is_active {
            self.request_active()
        } else {
            None
        }
    }

    /// Mark every cached query in a namespace stale. Returns the active key
    /// when it must be fetched now.
    pub fn invalidate(&mut self, namespace: &str) -> Option<QueryKey> {
        let count = self.cache.invalidate(namespace);
        debug!("invalidated {} {} queries", count, namespace);
        self.request_active()
    }

    /// Shorthand for invalidating the notes namespace after a mutation.
    pub fn invalidate_notes(&mut self) -> Option<QueryKey> {
        self.invalidate(NOTES_NAMESPACE)
    }

    /// Data to display: the active key's own result, else the placeholder's.
    pub fn data(&self) -> Option<(&FetchNotesResponse, bool)> {
        if let Some(data) = self.cache.get(&self.active).and_then(|e| e.data.as_ref()) {
            return Some((data, false));
        }
        self.placeholder
            .as_ref()
            .and_then(|key| self.cache.get(key))
            .and_then(|entry| entry.data.as_ref())
            .map(|data| (data, true))
    }

    /// Total pages of the displayed data, 0 when nothing is shown.
    pub fn total_pages(&self) -> u32 {
        match self.view() {
            QueryView::Ready { total_pages, .. } => total_pages,
            _ => 0,
        }
    }

    /// Whether the active key holds data of its own, not a placeholder.
    pub fn has_own_data(&self) -> bool {
        self.cache
            .get(&self.active)
            .is_some_and(|entry| entry.data.is_some())
    }

    pub fn is_fetching(&self) -> bool {
        self.cache
            .get(&self.active)
            .is_some_and(|entry| entry.in_flight)
    }

    pub fn view(&self) -> QueryView<'_> {
        let searching = !self.params.search.is_empty();
        let entry = self.cache.get(&self.active);
        let fetching = self.is_fetching();

        // A failed refresh keeps showing the data it was refreshing.
        if let Some(FetchStatus::Error(message)) = entry.map(|e| &e.status) {
            if !self.has_own_data() {
                return QueryView::Error(message);
            }
        }

        match self.data() {
            Some((data, _)) if data.notes.is_empty() => QueryView::Empty { searching },
            Some((data, placeholder)) => QueryView::Ready {
                notes: &data.notes,
                total_pages: data.total_pages,
                placeholder,
                fetching,
            },
            None => QueryView::Loading,
        }
    }

    /// Fetch `key` now and settle the result. Returns a follow-up key, if any.
    pub async fn fetch<A: NotesApi>(&mut self, api: &A, key: QueryKey) -> Option<QueryKey> {
        let result = api.list_notes(&key.params()).await;
        self.settle(&key, result)
    }

    /// Activate `params` and run fetches until the active entry settles.
    pub async fn ensure<A: NotesApi>(&mut self, api: &A, params: FetchNotesParams) {
        let mut next = self.set_params(params);
        while let Some(key) = next {
            next = self.fetch(api, key).await;
        }
    }
}
