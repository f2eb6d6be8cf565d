// NoteHub API endpoint functions.
// Typed list/create/delete calls on top of the HTTP client.

use crate::error::{NoteHubError, Result};

use super::api::NotesApi;
use super::client::NoteHubClient;
use super::types::{FetchNotesParams, FetchNotesResponse, NewNote, Note};

impl NoteHubClient {
    /// Query string for a list request. An empty search term is left out.
    fn list_query(&self, params: &FetchNotesParams) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(4);
        if !params.search.is_empty() {
            query.push(("search", params.search.clone()));
        }
        query.push(("page", params.page.to_string()));
        query.push(("perPage", self.per_page().to_string()));
        query.push(("sortBy", params.sort_by.as_str().to_string()));
        query
    }
}

impl NotesApi for NoteHubClient {
    async fn list_notes(&self, params: &FetchNotesParams) -> Result<FetchNotesResponse> {
        if params.page < 1 {
            return Err(NoteHubError::InvalidPage(params.page));
        }
        let response = self
            .get_with_params("/notes", &self.list_query(params))
            .await?;
        let notes: FetchNotesResponse = response.json().await?;
        Ok(notes)
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note> {
        let response = self.post_json("/notes", note).await?;
        let created: Note = response.json().await?;
        Ok(created)
    }

    async fn delete_note(&self, id: &str) -> Result<Note> {
        let response = self.delete(&format!("/notes/{}", id)).await?;
        let deleted: Note = response.json().await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use super::*;
    use crate::config::Config;
    use crate::notehub::types::{NoteTag, SortBy};

    const NOTE_JSON: &str = r#"{"id":"42","title":"Standup","content":"","tag":"Meeting","createdAt":"2025-03-01T10:00:00Z","updatedAt":"2025-03-01T10:00:00Z"}"#;

    /// Serve a single canned response and hand back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(request);
        });

        (format!("http://{}/api", addr), rx)
    }

    /// Read headers, then as many body bytes as Content-Length announces.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn client_for(base_url: String) -> NoteHubClient {
        let mut config = Config::new("test-token");
        config.api_url = base_url;
        NoteHubClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_list_notes_sends_query_and_token() {
        let (url, request) = serve_once(
            "200 OK",
            r#"{"notes":[{"id":"42","title":"Standup","content":"","tag":"Meeting","createdAt":"2025-03-01T10:00:00Z","updatedAt":"2025-03-01T10:00:00Z"}],"totalPages":2}"#,
        )
        .await;
        let client = client_for(url);

        let params = FetchNotesParams {
            search: "stand".to_string(),
            page: 2,
            sort_by: SortBy::Updated,
        };
        let result = client.list_notes(&params).await.unwrap();
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.notes[0].tag, NoteTag::Meeting);

        let request = request.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /api/notes?search=stand&page=2&perPage=12&sortBy=updated HTTP/1.1"
        );
        assert!(
            request
                .to_ascii_lowercase()
                .contains("authorization: bearer test-token")
        );
    }

    #[tokio::test]
    async fn test_list_notes_omits_empty_search() {
        let (url, request) = serve_once("200 OK", r#"{"notes":[],"totalPages":0}"#).await;
        let client = client_for(url);

        client
            .list_notes(&FetchNotesParams::default())
            .await
            .unwrap();

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /api/notes?page=1&perPage=12&sortBy=created "));
    }

    #[tokio::test]
    async fn test_list_notes_rejects_page_zero() {
        let client = client_for("http://127.0.0.1:1/api".to_string());
        let params = FetchNotesParams {
            page: 0,
            ..FetchNotesParams::default()
        };
        let result = client.list_notes(&params).await;
        assert!(matches!(result, Err(NoteHubError::InvalidPage(0))));
    }

    #[tokio::test]
    async fn test_create_note_posts_json_body() {
        let (url, request) = serve_once("201 Created", NOTE_JSON).await;
        let client = client_for(url);

        let note = NewNote {
            title: "Standup".to_string(),
            content: String::new(),
            tag: NoteTag::Meeting,
        };
        let created = client.create_note(&note).await.unwrap();
        assert_eq!(created.id, "42");

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /api/notes HTTP/1.1"));
        assert!(request.ends_with(r#"{"title":"Standup","content":"","tag":"Meeting"}"#));
    }

    #[tokio::test]
    async fn test_delete_missing_note_is_api_404() {
        let (url, request) = serve_once("404 Not Found", r#"{"message":"Note not found"}"#).await;
        let client = client_for(url);

        let err = client.delete_note("42").await.unwrap_err();
        assert!(err.is_not_found());
        match err {
            NoteHubError::Api { body, .. } => assert!(body.contains("Note not found")),
            other => panic!("unexpected error: {other:?}"),
        }

        let request = request.await.unwrap();
        assert!(request.starts_with("DELETE /api/notes/42 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (url, _request) = serve_once("200 OK", r#"{"items":[]}"#).await;
        let client = client_for(url);

        let err = client
            .list_notes(&FetchNotesParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NoteHubError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let mut config = Config::new("test-token");
        config.api_url = format!("http://{}/api", addr);
        config.timeout = Duration::from_millis(200);
        let client = NoteHubClient::new(&config).unwrap();

        let err = client
            .list_notes(&FetchNotesParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NoteHubError::Timeout));
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/api", addr));
        let err = client.delete_note("1").await.unwrap_err();
        assert!(matches!(err, NoteHubError::Network(_)));
    }
}
