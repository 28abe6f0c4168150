use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
    pub size: usize,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub enum FileBody {
    /// Held in memory until the rest of the form has arrived.
    Buffered(Bytes),
    /// Already streamed into storage as a multipart upload.
    Stored {
        key: String,
        content_type: String,
        size: usize,
    },
}

/// The `file` part of an upload form.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub body: FileBody,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl FilePart {
    pub fn is_stored(&self) -> bool {
        matches!(self.body, FileBody::Stored { .. })
    }
}

/// Fields collected from a multipart upload, in whatever order they arrived.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<FilePart>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}
