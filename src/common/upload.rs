use crate::infrastructure::storage::{MultipartStore, StorageError};
use aws_sdk_s3::types::CompletedPart;
use bytes::{Bytes, BytesMut};
use tracing::{error, info, warn};

// Minimum part size for S3 is 5MB. We use 6MB to be safe.
pub const MIN_PART_SIZE: usize = 6 * 1024 * 1024;

/// One multipart upload session. Written chunks are buffered until they fill
/// a part of at least [`MIN_PART_SIZE`]; the tail goes out on [`finish`].
///
/// [`finish`]: MultipartUploader::finish
pub struct MultipartUploader<'a, S: MultipartStore + ?Sized> {
    storage: &'a S,
    key: String,
    upload_id: String,
    parts: Vec<CompletedPart>,
    part_number: i32,
    buffer: BytesMut,
    written: usize,
}

impl<'a, S: MultipartStore + ?Sized> MultipartUploader<'a, S> {
    pub async fn new(storage: &'a S, key: &str, content_type: &str) -> Result<Self, StorageError> {
        let upload_id = storage.create_multipart_upload(key, content_type).await?;

        Ok(Self {
            storage,
            key: key.to_string(),
            upload_id,
            parts: Vec::new(),
            part_number: 1,
            buffer: BytesMut::with_capacity(MIN_PART_SIZE),
            written: 0,
        })
    }

    pub async fn write_chunk(&mut self, chunk: Bytes) -> Result<(), StorageError> {
        self.written += chunk.len();
        self.buffer.extend_from_slice(&chunk);

        if self.buffer.len() >= MIN_PART_SIZE {
            self.flush_part().await?;
        }

        Ok(())
    }

    async fn flush_part(&mut self) -> Result<(), StorageError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let body = self.buffer.split().freeze();
        let part = self
            .storage
            .upload_part(&self.key, &self.upload_id, self.part_number, body)
            .await
            .map_err(|e| {
                StorageError::Aborted(format!("part {} failed: {}", self.part_number, e))
            })?;

        self.parts.push(part);
        self.part_number += 1;

        Ok(())
    }

    /// Uploads the buffered tail and completes the upload, aborting it on
    /// failure. Returns the number of bytes written.
    pub async fn finish(mut self) -> Result<usize, StorageError> {
        if let Err(e) = self.flush_part().await {
            return Err(self.abort_with(e).await);
        }

        let parts = std::mem::take(&mut self.parts);
        let part_count = parts.len();
        if let Err(e) = self
            .storage
            .complete_multipart_upload(&self.key, &self.upload_id, parts)
            .await
        {
            return Err(self.abort_with(e).await);
        }

        info!(key = %self.key, parts = part_count, bytes = self.written, "Multipart upload completed");
        Ok(self.written)
    }

    pub async fn abort(&self) {
        if let Err(e) = self
            .storage
            .abort_multipart_upload(&self.key, &self.upload_id)
            .await
        {
            warn!(key = %self.key, error = %e, "Failed to abort multipart upload");
        }
    }

    /// Aborts the session and hands back the error that caused it.
    pub async fn abort_with(&self, cause: StorageError) -> StorageError {
        error!(key = %self.key, error = %cause, "Upload error, aborting");
        self.abort().await;
        cause
    }
}

/// Cuts `body` into consecutive parts of `part_size` bytes; only the last part
/// may be shorter. Slicing shares the underlying buffer.
pub fn split_parts(body: &Bytes, part_size: usize) -> Vec<Bytes> {
    let part_size = part_size.max(1);
    (0..body.len())
        .step_by(part_size)
        .map(|start| body.slice(start..(start + part_size).min(body.len())))
        .collect()
}

pub async fn upload_in_parts<S: MultipartStore + ?Sized>(
    storage: &S,
    key: &str,
    content_type: &str,
    body: Bytes,
) -> Result<usize, StorageError> {
    let mut uploader = MultipartUploader::new(storage, key, content_type).await?;

    for part in split_parts(&body, MIN_PART_SIZE) {
        if let Err(e) = uploader.write_chunk(part).await {
            return Err(uploader.abort_with(e).await);
        }
    }

    uploader.finish().await
}
