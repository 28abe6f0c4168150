use async_trait::async_trait;
use aws_sdk_s3::types::CompletedPart;
use bytes::Bytes;
use thiserror::Error;

pub mod s3;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    S3(#[from] aws_sdk_s3::Error),
    #[error("storage response missing {0}")]
    MissingField(&'static str),
    #[error("upload aborted: {0}")]
    Aborted(String),
}

/// Low-level multipart session calls, driven by
/// [`crate::common::upload::MultipartUploader`].
#[async_trait]
pub trait MultipartStore: Send + Sync {
    async fn create_multipart_upload(&self, key: &str, content_type: &str)
        -> Result<String, StorageError>;

    async fn upload_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<CompletedPart, StorageError>;

    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<(), StorageError>;

    async fn abort_multipart_upload(&self, key: &str, upload_id: &str)
        -> Result<(), StorageError>;
}

#[async_trait]
pub trait ObjectStore: MultipartStore {
    async fn put_object(&self, key: &str, content_type: &str, body: Bytes)
        -> Result<(), StorageError>;
}
