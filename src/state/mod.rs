// State management module.
// Holds the UI-side state for the search box, note list, form modal, and toasts.

#![allow(dead_code)]

pub mod form;
pub mod list;
pub mod search;
pub mod toast;

pub use form::{FormFocus, NoteFormState};
pub use list::NoteListState;
pub use search::SearchState;
pub use toast::{Toast, ToastLevel};
