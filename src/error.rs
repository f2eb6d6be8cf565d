// Error types for the notehub client.
// Covers form validation, transport failures, API status errors, and startup errors.

#![allow(dead_code)]

use thiserror::Error;

use crate::validation::FieldError;

#[derive(Error, Debug)]
pub enum NoteHubError {
    #[error("Invalid note: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Page must be at least 1, got {0}")]
    InvalidPage(u32),

    #[error("Missing NOTEHUB_TOKEN environment variable")]
    MissingToken,

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NoteHubError {
    /// Status code for API errors, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            NoteHubError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for NoteHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NoteHubError::Timeout
        } else if err.is_decode() {
            NoteHubError::Decode(err)
        } else {
            NoteHubError::Network(err)
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub type Result<T> = std::result::Result<T, NoteHubError>;
