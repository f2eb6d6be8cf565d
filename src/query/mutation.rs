// Mutation status tracking.
// Create and delete outcomes, with cache invalidation on success.

use log::{info, warn};

use crate::cache::QueryKey;
use crate::error::Result;

use super::QueryClient;

/// Status of a create or delete request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Success,
    Error(String),
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    /// Move to pending. Returns false if a request is already pending.
    pub fn start(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = MutationState::Pending;
        true
    }

    /// Record the outcome. On success every notes query is invalidated and
    /// the active key is returned when it must be fetched again.
    pub fn settle<T>(
        &mut self,
        label: &str,
        result: &Result<T>,
        queries: &mut QueryClient,
    ) -> Option<QueryKey> {
        match result {
            Ok(_) => {
                info!("{} succeeded", label);
                *self = MutationState::Success;
                queries.invalidate_notes()
            }
            Err(e) => {
                warn!("{} failed: {}", label, e);
                *self = MutationState::Error(e.to_string());
                None
            }
        }
    }

    pub fn reset(&mut self) {
        *self = MutationState::Idle;
    }
}
