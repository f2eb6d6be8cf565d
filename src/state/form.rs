// Create-note form state.
// Field input, focus order, and inline validation errors for the modal.

use crate::notehub::{NewNote, NoteTag};
use crate::validation::{Field, FieldError, NoteFormValues, error_for, validate_note_form};

/// Focusable elements of the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFocus {
    #[default]
    Title,
    Content,
    Tag,
    Cancel,
    Submit,
}

impl FormFocus {
    const ORDER: [FormFocus; 5] = [
        FormFocus::Title,
        FormFocus::Content,
        FormFocus::Tag,
        FormFocus::Cancel,
        FormFocus::Submit,
    ];

    pub fn next(&self) -> Self {
        let i = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Self {
        let i = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteFormState {
    pub values: NoteFormValues,
    pub tag: NoteTag,
    pub focus: FormFocus,
    pub errors: Vec<FieldError>,
}

impl NoteFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type into the focused text field.
    pub fn insert_char(&mut self, c: char) {
        match self.focus {
            FormFocus::Title => self.values.title.push(c),
            FormFocus::Content => self.values.content.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormFocus::Title => {
                self.values.title.pop();
            }
            FormFocus::Content => {
                self.values.content.pop();
            }
            _ => {}
        }
    }

    pub fn cycle_tag(&mut self, forward: bool) {
        self.tag = if forward {
            self.tag.next()
        } else {
            self.tag.prev()
        };
        self.values.tag = self.tag.as_str().to_string();
    }

    /// Validate the current input. Errors are kept for inline display.
    pub fn validate(&mut self) -> Option<NewNote> {
        match validate_note_form(&self.values) {
            Ok(note) => {
                self.errors.clear();
                Some(note)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        error_for(&self.errors, field)
    }
}
