// In-memory notes API for tests.
// Mirrors the server's search, sort, and pagination behavior and counts list calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};

use crate::error::{NoteHubError, Result};

use super::api::NotesApi;
use super::types::{FetchNotesParams, FetchNotesResponse, NewNote, Note, NoteTag, SortBy};

#[derive(Debug, Default)]
struct Inner {
    notes: Vec<Note>,
    next_id: u64,
    fail_lists: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeNotes {
    inner: Arc<Mutex<Inner>>,
    list_calls: Arc<AtomicUsize>,
    per_page: usize,
}

impl FakeNotes {
    pub fn new() -> Self {
        Self {
            per_page: 12,
            ..Self::default()
        }
    }

    /// A store holding `count` notes with ids "1".."count".
    pub fn with_notes(count: usize) -> Self {
        let fake = Self::new();
        {
            let mut inner = fake.inner.lock().unwrap();
            let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            for i in 1..=count {
                let created = base + Duration::minutes(i as i64);
                inner.notes.push(Note {
                    id: i.to_string(),
                    title: format!("Note {}", i),
                    content: if i % 2 == 0 { "even".into() } else { "odd".into() },
                    tag: NoteTag::ALL[i % NoteTag::ALL.len()],
                    created_at: created,
                    updated_at: created,
                });
            }
            inner.next_id = count as u64 + 1;
        }
        fake
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.inner.lock().unwrap().notes.len()
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.inner.lock().unwrap().fail_lists = fail;
    }

    fn matching(&self, params: &FetchNotesParams) -> Vec<Note> {
        let inner = self.inner.lock().unwrap();
        let needle = params.search.to_lowercase();
        let mut notes: Vec<Note> = inner
            .notes
            .iter()
            .filter(|n| {
                needle.is_empty()
                    || n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        match params.sort_by {
            SortBy::Created => notes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortBy::Updated => notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        }
        notes
    }
}

impl NotesApi for FakeNotes {
    async fn list_notes(&self, params: &FetchNotesParams) -> Result<FetchNotesResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if params.page < 1 {
            return Err(NoteHubError::InvalidPage(params.page));
        }
        if self.inner.lock().unwrap().fail_lists {
            return Err(NoteHubError::Api {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }

        let notes = self.matching(params);
        let total_pages = notes.len().div_ceil(self.per_page) as u32;
        let start = (params.page as usize - 1) * self.per_page;
        let page = notes.into_iter().skip(start).take(self.per_page).collect();
        Ok(FetchNotesResponse {
            notes: page,
            total_pages,
        })
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let now = Utc::now();
        let created = Note {
            id: id.to_string(),
            title: note.title.clone(),
            content: note.content.clone(),
            tag: note.tag,
            created_at: now,
            updated_at: now,
        };
        inner.notes.push(created.clone());
        Ok(created)
    }

    async fn delete_note(&self, id: &str) -> Result<Note> {
        let mut inner = self.inner.lock().unwrap();
        match inner.notes.iter().position(|n| n.id == id) {
            Some(index) => Ok(inner.notes.remove(index)),
            None => Err(NoteHubError::Api {
                status: 404,
                body: "Note not found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pages_never_exceed_per_page() {
        let fake = FakeNotes::with_notes(30);
        for sort_by in [SortBy::Created, SortBy::Updated] {
            for search in ["", "even", "Note 1"] {
                let total_matching = fake
                    .matching(&FetchNotesParams {
                        search: search.to_string(),
                        page: 1,
                        sort_by,
                    })
                    .len();
                for page in 1..=4 {
                    let params = FetchNotesParams {
                        search: search.to_string(),
                        page,
                        sort_by,
                    };
                    let result = fake.list_notes(&params).await.unwrap();
                    assert!(result.notes.len() <= 12);
                    assert!(result.total_pages as usize >= total_matching.div_ceil(12));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_delete_unknown_is_404() {
        let fake = FakeNotes::with_notes(2);
        let err = fake.delete_note("99").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fake.total(), 2);
    }
}
