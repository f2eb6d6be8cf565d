// NoteHub API types.
// Defines the note model, list query parameters, and request/response bodies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTag::Todo => "Todo",
            NoteTag::Work => "Work",
            NoteTag::Personal => "Personal",
            NoteTag::Meeting => "Meeting",
            NoteTag::Shopping => "Shopping",
        }
    }

    /// The next tag in display order, wrapping around.
    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// The previous tag in display order, wrapping around.
    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tag name is not one of [`NoteTag::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl FromStr for NoteTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteTag::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// A note as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort field for the notes list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Created,
    Updated,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Created => "created",
            SortBy::Updated => "updated",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            SortBy::Created => SortBy::Updated,
            SortBy::Updated => SortBy::Created,
        }
    }
}

/// Parameters of a list query. These are the only inputs that shape the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchNotesParams {
    pub search: String,
    pub page: u32,
    pub sort_by: SortBy,
}

impl Default for FetchNotesParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            sort_by: SortBy::Created,
        }
    }
}

impl FetchNotesParams {
    /// Same query with a new search term, back on the first page.
    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: 1,
            sort_by: self.sort_by,
        }
    }

    /// Same query on a different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            search: self.search.clone(),
            page: page.max(1),
            sort_by: self.sort_by,
        }
    }

    /// Same query with the other sort field, back on the first page.
    pub fn with_sort(&self, sort_by: SortBy) -> Self {
        Self {
            search: self.search.clone(),
            page: 1,
            sort_by,
        }
    }
}

/// Response body of `GET /notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchNotesResponse {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}

/// A validated note ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}
