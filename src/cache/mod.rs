// Cache module for list query results.
// In-memory store keyed by serialized query parameters, owned by the query client.

#![allow(dead_code, unused_imports)]

pub mod key;
pub mod store;

pub use key::{NOTES_NAMESPACE, QueryKey};
pub use store::{CacheEntry, DEFAULT_TTL, FetchStatus, QueryCache};
