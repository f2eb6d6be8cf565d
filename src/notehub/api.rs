// Notes API seam.
// The query and mutation layers are generic over this trait.

use std::future::Future;

use crate::error::Result;

use super::types::{FetchNotesParams, FetchNotesResponse, NewNote, Note};

/// Remote notes operations. One attempt per call, no retries.
pub trait NotesApi: Clone + Send + Sync + 'static {
    /// Fetch one page of notes matching the search term.
    fn list_notes(
        &self,
        params: &FetchNotesParams,
    ) -> impl Future<Output = Result<FetchNotesResponse>> + Send;

    /// Create a note and return it as stored.
    fn create_note(&self, note: &NewNote) -> impl Future<Output = Result<Note>> + Send;

    /// Delete a note by id and return the removed note.
    fn delete_note(&self, id: &str) -> impl Future<Output = Result<Note>> + Send;
}
