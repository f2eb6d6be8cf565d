// Note list selection state.
// Keyboard navigation over whatever page of notes is currently displayed.

use ratatui::widgets::ListState;

/// Selection over a list whose length is owned elsewhere.
#[derive(Debug, Clone, Default)]
pub struct NoteListState {
    pub list_state: ListState,
}

impl NoteListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently selected index.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Select the next item in a list of `len` items.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= len - 1 => i, // Stay at end
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item in a list of `len` items.
    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Keep the selection valid after the list changed length.
    pub fn clamp(&mut self, len: usize) {
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Reset selection to the first item.
    pub fn reset(&mut self, len: usize) {
        self.list_state.select(if len == 0 { None } else { Some(0) });
        *self.list_state.offset_mut() = 0;
    }
}
