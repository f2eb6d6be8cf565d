// Note form validation.
// Pure checks over raw form input, producing field-scoped messages.

use std::fmt;

use crate::notehub::{NewNote, NoteTag};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 50;
pub const CONTENT_MAX: usize = 500;

/// Form field an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Content,
    Tag,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Title => "title",
            Field::Content => "content",
            Field::Tag => "tag",
        })
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw, unvalidated form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFormValues {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Default for NoteFormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().as_str().to_string(),
        }
    }
}

/// Validate form input. On success the title and content come back trimmed.
pub fn validate_note_form(values: &NoteFormValues) -> Result<NewNote, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = values.title.trim();
    let title_len = title.chars().count();
    if title_len == 0 {
        errors.push(FieldError::new(Field::Title, "Title is required."));
    } else if title_len < TITLE_MIN {
        errors.push(FieldError::new(
            Field::Title,
            format!("Title must be at least {} characters long.", TITLE_MIN),
        ));
    } else if title_len > TITLE_MAX {
        errors.push(FieldError::new(
            Field::Title,
            format!("Title must be no more than {} characters long.", TITLE_MAX),
        ));
    }

    let content = values.content.trim();
    if content.chars().count() > CONTENT_MAX {
        errors.push(FieldError::new(
            Field::Content,
            format!("Content must be no more than {} characters long.", CONTENT_MAX),
        ));
    }

    let tag = match values.tag.trim() {
        "" => {
            errors.push(FieldError::new(Field::Tag, "Tag is required."));
            None
        }
        name => match name.parse::<NoteTag>() {
            Ok(tag) => Some(tag),
            Err(_) => {
                errors.push(FieldError::new(Field::Tag, allowed_tags_message()));
                None
            }
        },
    };

    match tag {
        Some(tag) if errors.is_empty() => Ok(NewNote {
            title: title.to_string(),
            content: content.to_string(),
            tag,
        }),
        _ => Err(errors),
    }
}

fn allowed_tags_message() -> String {
    let names: Vec<&str> = NoteTag::ALL.iter().map(|t| t.as_str()).collect();
    format!("Tag must be one of: {}.", names.join(", "))
}

/// First message for a field, if it failed.
pub fn error_for(errors: &[FieldError], field: Field) -> Option<&str> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.as_str())
}
