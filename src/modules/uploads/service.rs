use super::dto::{FileBody, UploadForm, UploadResponse};
use crate::common::public_url::{PublicUrlError, object_key, public_object_url};
use crate::common::response::ApiError;
use crate::infrastructure::storage::StorageError;
use crate::state::AppState;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Malformed multipart request: {}", .0.body_text())]
    Multipart(#[from] MultipartError),
    #[error("No file provided")]
    MissingFile,
    #[error("No filename provided")]
    MissingFilename,
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
    #[error("Upload failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to build public url: {0}")]
    PublicUrl(#[from] PublicUrlError),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::Multipart(e) => e.status(),
            UploadError::MissingFile
            | UploadError::MissingFilename
            | UploadError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            UploadError::Storage(_) | UploadError::PublicUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        let status = e.status();
        ApiError(e.to_string(), status)
    }
}

/// Explicit form field, then the file part's own type, then a guess from the
/// filename.
pub fn resolve_content_type(explicit: Option<&str>, part: Option<&str>, filename: &str) -> String {
    [explicit, part]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|ct| !ct.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| mime_guess::from_path(filename).first_or_octet_stream().to_string())
}

pub fn upload_key(filename: &str) -> Result<String, UploadError> {
    object_key(filename).map_err(|e| match e {
        PublicUrlError::EmptyKey => UploadError::MissingFilename,
        _ => UploadError::InvalidFilename(filename.to_string()),
    })
}

pub struct UploadService;

impl UploadService {
    pub async fn relay(state: AppState, form: UploadForm) -> Result<UploadResponse, UploadError> {
        let file = form.file.ok_or(UploadError::MissingFile)?;

        let (key, content_type, size) = match file.body {
            FileBody::Stored { key, content_type, size } => (key, content_type, size),
            FileBody::Buffered(bytes) => {
                let filename = form
                    .filename
                    .filter(|name| !name.trim().is_empty())
                    .or_else(|| file.file_name.clone())
                    .ok_or(UploadError::MissingFilename)?;
                let key = upload_key(&filename)?;

                let content_type = resolve_content_type(
                    form.content_type.as_deref(),
                    file.content_type.as_deref(),
                    &key,
                );
                let size = bytes.len();

                state.storage.put_object(&key, &content_type, bytes).await?;
                (key, content_type, size)
            }
        };

        let url = public_object_url(&state.config.storage, &key)?;
        info!(%key, %content_type, size, %url, "Upload relayed to storage");

        Ok(UploadResponse {
            url: url.to_string(),
            key,
            size,
            content_type,
        })
    }
}
