//! In-memory stand-ins for the database, object storage and provider.

use crate::config::settings::{AppConfig, ProviderConfig, StorageConfig};
use crate::infrastructure::provider::{ProviderError, VideoProvider};
use crate::infrastructure::storage::{MultipartStore, ObjectStore, StorageError};
use crate::modules::notifications::memory_host::MemoryHost;
use crate::modules::videos::model::{NewVideo, Video, VideoStatus};
use crate::modules::videos::repository::VideoStore;
use crate::state::AppState;
use crate::workers::notifier::{DispatchEvent, PushSender};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::types::CompletedPart;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        database_url: "postgres://unused".to_string(),
        storage: StorageConfig {
            endpoint: Some("http://minio:9000".to_string()),
            bucket: "videos".to_string(),
            region: "us-east-1".to_string(),
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            public_url: Some("https://cdn.example.com".to_string()),
        },
        provider: ProviderConfig {
            base_url: "https://provider.invalid".to_string(),
            token_id: "id".to_string(),
            token_secret: "secret".to_string(),
        },
        push_queue_capacity: 16,
        upload_max_bytes: 1024 * 1024,
        open_windows: true,
        notification_limit: 50,
        view_limit: 16,
    }
}

#[derive(Default)]
pub struct FakeVideoStore {
    pub videos: Mutex<Vec<Video>>,
    pub fail: bool,
    pub writes: Mutex<usize>,
}

impl FakeVideoStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_video(self, asset_id: &str, filename: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        self.videos.lock().push(Video {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            filename: filename.to_string(),
            source_url: format!("https://cdn.example.com/{filename}"),
            asset_id: Some(asset_id.to_string()),
            playback_id: None,
            status: VideoStatus::Processing.as_str().to_string(),
            created_at: now,
            updated_at: now,
        });
        self
    }

    pub fn find(&self, asset_id: &str) -> Option<Video> {
        self.videos
            .lock()
            .iter()
            .find(|v| v.asset_id.as_deref() == Some(asset_id))
            .cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

#[async_trait]
impl VideoStore for FakeVideoStore {
    async fn create_processing(&self, video: NewVideo) -> Result<Video> {
        *self.writes.lock() += 1;
        if self.fail {
            return Err(anyhow!("Failed to create video record: connection refused"));
        }
        let now = OffsetDateTime::now_utc();
        let video = Video {
            id: Uuid::new_v4(),
            user_id: video.user_id,
            filename: video.filename,
            source_url: video.source_url,
            asset_id: Some(video.asset_id),
            playback_id: None,
            status: VideoStatus::Processing.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.videos.lock().push(video.clone());
        Ok(video)
    }

    async fn mark_ready(&self, asset_id: &str, playback_id: &str) -> Result<Option<Video>> {
        *self.writes.lock() += 1;
        if self.fail {
            return Err(anyhow!("Failed to update video record: connection refused"));
        }
        let mut videos = self.videos.lock();
        let Some(video) = videos
            .iter_mut()
            .find(|v| v.asset_id.as_deref() == Some(asset_id))
        else {
            return Ok(None);
        };
        video.status = VideoStatus::Ready.as_str().to_string();
        video.playback_id = Some(playback_id.to_string());
        Ok(Some(video.clone()))
    }

    async fn find_by_asset_id(&self, asset_id: &str) -> Result<Option<Video>> {
        if self.fail {
            return Err(anyhow!("Failed to fetch video record: connection refused"));
        }
        Ok(self.find(asset_id))
    }
}

/// Keeps finished objects in memory and journals every storage call.
#[derive(Default)]
pub struct FakeObjectStore {
    pub objects: Mutex<Vec<(String, String, Bytes)>>,
    pub fail: bool,
    /// Part number whose upload is rejected.
    pub fail_part: Option<i32>,
    pub journal: Mutex<Vec<String>>,
    pub sessions: Mutex<HashMap<String, (String, String, Vec<Bytes>)>>,
}

impl FakeObjectStore {
    pub fn calls(&self) -> Vec<String> {
        self.journal.lock().clone()
    }

    fn record(&self, call: String) {
        self.journal.lock().push(call);
    }
}

#[async_trait]
impl MultipartStore for FakeObjectStore {
    async fn create_multipart_upload(&self, key: &str, content_type: &str) -> Result<String, StorageError> {
        self.record(format!("create:{key}"));
        if self.fail {
            return Err(StorageError::Aborted("bucket unavailable".to_string()));
        }
        let mut sessions = self.sessions.lock();
        let upload_id = format!("upload-{}", sessions.len() + 1);
        sessions.insert(
            upload_id.clone(),
            (key.to_string(), content_type.to_string(), Vec::new()),
        );
        Ok(upload_id)
    }

    async fn upload_part(
        &self,
        _key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<CompletedPart, StorageError> {
        self.record(format!("part:{part_number}:{}", body.len()));
        if self.fail_part == Some(part_number) {
            return Err(StorageError::Aborted("part rejected".to_string()));
        }
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(upload_id)
            .ok_or(StorageError::MissingField("upload session"))?;
        session.2.push(body);
        Ok(CompletedPart::builder()
            .part_number(part_number)
            .e_tag(format!("etag-{part_number}"))
            .build())
    }

    async fn complete_multipart_upload(
        &self,
        _key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<(), StorageError> {
        self.record(format!("complete:{}", parts.len()));
        let (key, content_type, chunks) = self
            .sessions
            .lock()
            .remove(upload_id)
            .ok_or(StorageError::MissingField("upload session"))?;
        self.objects
            .lock()
            .push((key, content_type, Bytes::from(chunks.concat())));
        Ok(())
    }

    async fn abort_multipart_upload(&self, _key: &str, upload_id: &str) -> Result<(), StorageError> {
        self.record("abort".to_string());
        self.sessions.lock().remove(upload_id);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put_object(&self, key: &str, content_type: &str, body: Bytes) -> Result<(), StorageError> {
        self.record(format!("put:{key}"));
        if self.fail {
            return Err(StorageError::Aborted("bucket unavailable".to_string()));
        }
        self.objects
            .lock()
            .push((key.to_string(), content_type.to_string(), body));
        Ok(())
    }
}

/// Answers every call with a fixed response.
pub struct FakeProvider {
    pub response: Mutex<Option<std::result::Result<Value, (u16, String)>>>,
    pub inputs: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn ok(body: Value) -> Self {
        Self {
            response: Mutex::new(Some(Ok(body))),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16, message: &str) -> Self {
        Self {
            response: Mutex::new(Some(Err((status, message.to_string())))),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn missing() -> Self {
        Self {
            response: Mutex::new(None),
            inputs: Mutex::new(Vec::new()),
        }
    }

    fn answer(&self, input: &str) -> std::result::Result<Value, ProviderError> {
        self.inputs.lock().push(input.to_string());
        match self.response.lock().clone() {
            Some(Ok(body)) => Ok(body),
            Some(Err((status, message))) => Err(ProviderError::Rejected { status, message }),
            None => Err(ProviderError::NotFound(input.to_string())),
        }
    }
}

#[async_trait]
impl VideoProvider for FakeProvider {
    async fn create_asset(&self, input_url: &str) -> std::result::Result<Value, ProviderError> {
        self.answer(input_url)
    }

    async fn get_asset(&self, asset_id: &str) -> std::result::Result<Value, ProviderError> {
        self.answer(asset_id)
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub events: mpsc::Receiver<DispatchEvent>,
}

pub struct TestAppBuilder {
    config: AppConfig,
    videos: Arc<FakeVideoStore>,
    storage: Arc<FakeObjectStore>,
    provider: Arc<FakeProvider>,
    host: Arc<MemoryHost>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            videos: Arc::new(FakeVideoStore::default()),
            storage: Arc::new(FakeObjectStore::default()),
            provider: Arc::new(FakeProvider::missing()),
            host: Arc::new(MemoryHost::new()),
        }
    }

    pub fn config(mut self, f: impl FnOnce(&mut AppConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn videos(mut self, videos: Arc<FakeVideoStore>) -> Self {
        self.videos = videos;
        self
    }

    pub fn storage(mut self, storage: Arc<FakeObjectStore>) -> Self {
        self.storage = storage;
        self
    }

    pub fn provider(mut self, provider: Arc<FakeProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn host(mut self, host: Arc<MemoryHost>) -> Self {
        self.host = host;
        self
    }

    pub fn build(self) -> TestApp {
        let (push, events) = PushSender::channel(self.config.push_queue_capacity);
        let state = AppState::new(
            self.config,
            self.videos,
            self.storage,
            self.provider,
            push,
            self.host,
        );
        let router = crate::app::create_app(state.clone());
        TestApp {
            state,
            router,
            events,
        }
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
        };
        (status, json)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
