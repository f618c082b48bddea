//! HTTP/JSON client for the memory timeline backend.
//!
//! The backend serves the four endpoints under `/api`; records come back as
//! bare JSON (no RPC envelope) and any non-2xx status is a failure.

use async_trait::async_trait;
use memory_timeline_types::{MemoryPayload, MemoryRecord, UploadResponse, UPLOAD_FIELD};
use reqwest::multipart::{Form, Part};
use std::fmt;

/// Backend call error with status code information
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    /// HTTP status code if the backend answered at all
    pub status_code: Option<u16>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        ApiError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// 4xx: the backend rejected the request itself
    pub fn is_client_error(&self) -> bool {
        self.status_code.map(|c| (400..500).contains(&c)).unwrap_or(false)
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code.map(|c| c >= 500).unwrap_or(false)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.status_code {
            write!(f, "[HTTP {}] {}", code, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ApiError {}

impl From<String> for ApiError {
    fn from(s: String) -> Self {
        ApiError::new(s)
    }
}

/// The remote collaborator as the controller sees it.
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    async fn list_memories(&self) -> Result<Vec<MemoryRecord>, ApiError>;

    async fn create_memory(&self, payload: &MemoryPayload) -> Result<MemoryRecord, ApiError>;

    async fn update_memory(
        &self,
        id: &str,
        payload: &MemoryPayload,
    ) -> Result<MemoryRecord, ApiError>;

    /// Upload an image and return the URL the backend stored it under.
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError>;
}

pub struct MemoryClient {
    base_url: String,
    client: reqwest::Client,
}

impl MemoryClient {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =====================================================
    // HTTP helpers
    // =====================================================

    async fn read_json<T: serde::de::DeserializeOwned>(
        resp: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, ApiError> {
        let resp = resp.map_err(|e| ApiError::new(format!("Memory backend unavailable: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                body
            };
            return Err(ApiError::with_status(message, status.as_u16()));
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::new(format!("Invalid response from memory backend: {}", e)))
    }
}

#[async_trait]
impl MemoryBackend for MemoryClient {
    async fn list_memories(&self) -> Result<Vec<MemoryRecord>, ApiError> {
        let resp = self.client.get(self.url("/api/memories")).send().await;
        Self::read_json(resp).await
    }

    async fn create_memory(&self, payload: &MemoryPayload) -> Result<MemoryRecord, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/memories"))
            .json(payload)
            .send()
            .await;
        Self::read_json(resp).await
    }

    async fn update_memory(
        &self,
        id: &str,
        payload: &MemoryPayload,
    ) -> Result<MemoryRecord, ApiError> {
        let path = format!("/api/memories/{}", urlencoding::encode(id));
        let resp = self.client.put(self.url(&path)).json(payload).send().await;
        Self::read_json(resp).await
    }

    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(UPLOAD_FIELD, part);
        let resp = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await;
        let uploaded: UploadResponse = Self::read_json(resp).await?;
        Ok(uploaded.image_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Multipart, Path, State};
    use axum::http::StatusCode;
    use axum::response::Json;
    use axum::routing::{get, post, put};
    use axum::Router;
    use std::sync::{Arc, Mutex};

    /// Minimal in-process stand-in for the memory backend.
    #[derive(Default)]
    struct FakeServer {
        records: Mutex<Vec<MemoryRecord>>,
        uploads: Mutex<Vec<(String, String, usize)>>,
    }

    async fn list(State(s): State<Arc<FakeServer>>) -> Json<Vec<MemoryRecord>> {
        Json(s.records.lock().unwrap().clone())
    }

    async fn create(
        State(s): State<Arc<FakeServer>>,
        Json(p): Json<MemoryPayload>,
    ) -> Json<MemoryRecord> {
        let mut records = s.records.lock().unwrap();
        let record = MemoryRecord {
            id: format!("id-{}", records.len() + 1),
            date: p.date,
            title: p.title,
            photo: p.photo,
            note: p.note,
            created_at: Some("2025-07-01T12:00:00.000Z".to_string()),
        };
        records.push(record.clone());
        Json(record)
    }

    async fn update(
        State(s): State<Arc<FakeServer>>,
        Path(id): Path<String>,
        Json(p): Json<MemoryPayload>,
    ) -> Result<Json<MemoryRecord>, (StatusCode, String)> {
        let mut records = s.records.lock().unwrap();
        let existing = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or((StatusCode::NOT_FOUND, "Memory not found".to_string()))?;
        existing.date = p.date;
        existing.title = p.title;
        existing.photo = p.photo;
        existing.note = p.note;
        Ok(Json(existing.clone()))
    }

    async fn upload(
        State(s): State<Arc<FakeServer>>,
        mut multipart: Multipart,
    ) -> Json<UploadResponse> {
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            let len = field.bytes().await.unwrap().len();
            s.uploads.lock().unwrap().push((name, file_name.clone(), len));
        }
        let file_name = s
            .uploads
            .lock()
            .unwrap()
            .last()
            .map(|u| u.1.clone())
            .unwrap_or_default();
        Json(UploadResponse {
            image_url: format!("https://cdn.example/{}", file_name),
        })
    }

    async fn spawn_server(state: Arc<FakeServer>) -> String {
        let app = Router::new()
            .route("/api/memories", get(list).post(create))
            .route("/api/memories/:id", put(update))
            .route("/api/upload", post(upload))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn payload(date: &str, title: &str) -> MemoryPayload {
        MemoryPayload {
            date: date.to_string(),
            title: title.to_string(),
            photo: String::new(),
            note: "note".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_list_update_roundtrip() {
        let server = Arc::new(FakeServer::default());
        let base = spawn_server(server.clone()).await;
        let client = MemoryClient::new(&base, reqwest::Client::new());

        let created = client.create_memory(&payload("2025-06-05", "First")).await.unwrap();
        assert_eq!(created.id, "id-1");
        assert!(created.created_at.is_some());

        let mut changed = payload("2025-06-06", "First, edited");
        changed.photo = "https://cdn.example/a.jpg".to_string();
        let updated = client.update_memory(&created.id, &changed).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "First, edited");

        let all = client.list_memories().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].photo, "https://cdn.example/a.jpg");
    }

    #[tokio::test]
    async fn test_update_unknown_id_carries_status() {
        let server = Arc::new(FakeServer::default());
        let base = spawn_server(server).await;
        let client = MemoryClient::new(&base, reqwest::Client::new());

        let err = client
            .update_memory("missing", &payload("2025-01-01", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code, Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(err.to_string().contains("Memory not found"));
    }

    #[tokio::test]
    async fn test_upload_sends_image_field() {
        let server = Arc::new(FakeServer::default());
        let base = spawn_server(server.clone()).await;
        let client = MemoryClient::new(&base, reqwest::Client::new());

        let url = client
            .upload_image("beach.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example/beach.jpg");

        let uploads = server.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0], ("image".to_string(), "beach.jpg".to_string(), 4));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = MemoryClient::new(&format!("http://{}", addr), reqwest::Client::new());
        let err = client.list_memories().await.unwrap_err();
        assert!(err.status_code.is_none());
        assert!(err.message.starts_with("Memory backend unavailable"));
    }
}
