use super::dto::{FileBody, FilePart, UploadForm, UploadResponse};
use super::service::{UploadError, UploadService, resolve_content_type, upload_key};
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::common::upload::{MIN_PART_SIZE, MultipartUploader};
use crate::infrastructure::storage::ObjectStore;
use crate::state::AppState;
use axum::{
    extract::{
        Multipart, State,
        multipart::{Field, MultipartRejection},
    },
    response::IntoResponse,
};
use bytes::{Bytes, BytesMut};
use tracing::{info, warn};

/// Upload a file to object storage
/// Multipart fields: `file`, `filename`, optional `contentType`
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload successful", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Missing file or filename"),
        (status = 413, description = "Upload exceeds the body limit"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Uploads"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => return ApiError::bad_request(e.body_text()).into_response(),
    };

    let form = match read_form(&state, multipart).await {
        Ok(form) => form,
        Err(e) => return ApiError::from(e).into_response(),
    };

    match UploadService::relay(state, form).await {
        Ok(res) => ApiSuccess::ok(res, "File uploaded successfully").into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn read_form(state: &AppState, mut multipart: Multipart) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                form.file = Some(read_file(state, &form, field).await?);
            }
            "filename" | "fileName" => {
                let value = field.text().await?;
                warn_if_late(&form, &name);
                form.filename = Some(value);
            }
            "contentType" | "content_type" => {
                let value = field.text().await?;
                warn_if_late(&form, &name);
                form.content_type = Some(value);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn warn_if_late(form: &UploadForm, field: &str) {
    if form.file.as_ref().is_some_and(FilePart::is_stored) {
        warn!(field, "Field arrived after the file was streamed, ignoring");
    }
}

/// Buffers the file part. Once the buffer fills a storage part and the target
/// filename is already known, the rest of the part is streamed into a
/// multipart upload instead of being held in memory.
async fn read_file(
    state: &AppState,
    form: &UploadForm,
    mut field: Field<'_>,
) -> Result<FilePart, UploadError> {
    let file_name = field.file_name().map(str::to_string);
    let part_type = field.content_type().map(str::to_string);
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field.chunk().await? {
        buffer.extend_from_slice(&chunk);
        if buffer.len() < MIN_PART_SIZE {
            continue;
        }
        let Some(filename) = form.filename.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };

        let key = upload_key(filename)?;
        let content_type =
            resolve_content_type(form.content_type.as_deref(), part_type.as_deref(), &key);
        let size = stream_rest(
            state.storage.as_ref(),
            &key,
            &content_type,
            buffer.freeze(),
            &mut field,
        )
        .await?;

        return Ok(FilePart {
            body: FileBody::Stored { key, content_type, size },
            file_name,
            content_type: part_type,
        });
    }

    info!(size = buffer.len(), file_name = ?file_name, "Received file part");
    Ok(FilePart {
        body: FileBody::Buffered(buffer.freeze()),
        file_name,
        content_type: part_type,
    })
}

async fn stream_rest(
    storage: &dyn ObjectStore,
    key: &str,
    content_type: &str,
    head: Bytes,
    field: &mut Field<'_>,
) -> Result<usize, UploadError> {
    info!(%key, "File part outgrew a single part, streaming to storage");
    let mut uploader = MultipartUploader::new(storage, key, content_type).await?;

    if let Err(e) = uploader.write_chunk(head).await {
        return Err(uploader.abort_with(e).await.into());
    }

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if let Err(e) = uploader.write_chunk(chunk).await {
                    return Err(uploader.abort_with(e).await.into());
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(%key, error = %e, "File stream interrupted, aborting upload");
                uploader.abort().await;
                return Err(e.into());
            }
        }
    }

    Ok(uploader.finish().await?)
}
