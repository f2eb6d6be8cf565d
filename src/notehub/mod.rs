// NoteHub API module.
// Provides the client, the API trait, and types for the remote notes service.

#![allow(dead_code, unused_imports)]

pub mod api;
pub mod client;
pub mod endpoints;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use api::NotesApi;
pub use client::NoteHubClient;
pub use types::*;
