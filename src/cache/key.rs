// Cache keys for list queries.
// A key is the namespace plus every parameter that shapes the result set.

use std::fmt;

use crate::notehub::{FetchNotesParams, SortBy};

/// Namespace shared by every notes list query.
pub const NOTES_NAMESPACE: &str = "notes";

/// Identifies one query's result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub namespace: &'static str,
    pub search: String,
    pub sort_by: SortBy,
    pub page: u32,
}

impl QueryKey {
    /// Key for a notes list query.
    pub fn notes(params: &FetchNotesParams) -> Self {
        Self {
            namespace: NOTES_NAMESPACE,
            search: params.search.clone(),
            sort_by: params.sort_by,
            page: params.page,
        }
    }

    /// The parameters this key was built from.
    pub fn params(&self) -> FetchNotesParams {
        FetchNotesParams {
            search: self.search.clone(),
            page: self.page,
            sort_by: self.sort_by,
        }
    }

    /// Serialized form used as the cache map key: `["notes","milk","created",1]`.
    pub fn serialize(&self) -> String {
        serde_json::json!([self.namespace, self.search, self.sort_by, self.page]).to_string()
    }

    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
