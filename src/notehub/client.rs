// NoteHub API HTTP client.
// Handles authentication, timeouts, and response status checking.

use log::debug;
use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Serialize;

use crate::config::Config;
use crate::error::{NoteHubError, Result};

/// NoteHub API client. Every request carries the bearer token and the configured timeout.
#[derive(Debug, Clone)]
pub struct NoteHubClient {
    client: Client,
    base_url: String,
    per_page: u32,
}

impl NoteHubClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.token))
                .map_err(|e| NoteHubError::InvalidHeader(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("notehub-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(NoteHubError::Network)?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            per_page: config.per_page,
        })
    }

    /// Notes requested per list page.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        let response = self.client.get(&url).query(params).send().await?;
        check_response(response).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response> {
        let url = self.url(endpoint);
        debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        check_response(response).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, endpoint: &str) -> Result<Response> {
        let url = self.url(endpoint);
        debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        check_response(response).await
    }
}

/// Pass 2xx responses through and turn everything else into an API error.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(NoteHubError::Api {
        status: status.as_u16(),
        body,
    })
}
