// Search box state.
// Holds the typed text and debounces it before it reaches the query.

use std::time::{Duration, Instant};

use crate::debounce::Debouncer;

#[derive(Debug, Clone)]
pub struct SearchState {
    /// Text as typed, updated on every keystroke.
    pub input: String,
    /// Whether keystrokes go to the search box.
    pub focused: bool,
    debouncer: Debouncer<String>,
}

impl SearchState {
    pub fn new(delay: Duration) -> Self {
        Self {
            input: String::new(),
            focused: false,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.input.push(c);
        self.debouncer.push(self.input.clone(), now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.input.pop().is_some() {
            self.debouncer.push(self.input.clone(), now);
        }
    }

    pub fn clear(&mut self, now: Instant) {
        if !self.input.is_empty() {
            self.input.clear();
            self.debouncer.push(String::new(), now);
        }
    }

    /// The settled search term, once typing has paused long enough.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        self.debouncer.poll(now)
    }

    /// Skip the quiet period and take whatever is pending.
    pub fn flush(&mut self) -> Option<String> {
        if self.debouncer.is_pending() {
            self.debouncer.cancel();
            Some(self.input.clone())
        } else {
            None
        }
    }

    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_ready(now)
    }
}
