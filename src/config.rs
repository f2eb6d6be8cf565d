// Runtime configuration.
// Reads the API endpoint, bearer token, and client tunables from the environment.

use std::time::Duration;

use crate::error::{NoteHubError, Result};

pub const DEFAULT_API_URL: &str = "https://notehub-public.goit.study/api";

pub const TOKEN_VAR: &str = "NOTEHUB_TOKEN";
pub const API_URL_VAR: &str = "NOTEHUB_API_URL";
pub const LOG_VAR: &str = "NOTEHUB_LOG";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the notes API, without a trailing slash.
    pub api_url: String,
    /// Bearer token attached to every request.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Notes requested per page.
    pub per_page: u32,
    /// How long a successful list result is served without a new request.
    pub stale_time: Duration,
    /// Quiet period before a search edit updates the query.
    pub search_debounce: Duration,
}

impl Config {
    /// Configuration with the default endpoint and tunables.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(2),
            per_page: 12,
            stale_time: Duration::from_secs(5 * 60),
            search_debounce: Duration::from_millis(300),
        }
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(NoteHubError::MissingToken)?;

        let mut config = Self::new(token);
        if let Some(url) = lookup(API_URL_VAR).filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }
        Ok(config)
    }
}
