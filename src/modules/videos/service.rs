use super::dto::{
    ASSET_READY_EVENT, AssetStatusResponse, SubmitVideoRequest, WebhookAck, WebhookEvent,
    provider_asset_id, provider_asset_status, provider_playback_id,
};
use super::model::{NewVideo, Video, VideoStatus};
use crate::common::public_url::{PublicUrlError, object_key, public_object_url};
use crate::common::response::ApiError;
use crate::infrastructure::provider::ProviderError;
use crate::modules::notifications::payload::NotificationPayload;
use crate::state::AppState;
use axum::http::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Failed to build public url: {0}")]
    PublicUrl(#[from] PublicUrlError),
    #[error("{0}")]
    Provider(#[from] ProviderError),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Database(anyhow::Error),
}

impl VideoError {
    pub fn status(&self) -> StatusCode {
        match self {
            VideoError::BadRequest(_) => StatusCode::BAD_REQUEST,
            VideoError::Provider(ProviderError::NotFound(_)) => StatusCode::NOT_FOUND,
            VideoError::Provider(ProviderError::InvalidAssetId(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<VideoError> for ApiError {
    fn from(e: VideoError) -> Self {
        let status = e.status();
        ApiError(e.to_string(), status)
    }
}

pub struct VideoService;

impl VideoService {
    pub async fn handle_webhook(state: AppState, event: WebhookEvent) -> Result<WebhookAck, VideoError> {
        if event.event_type != ASSET_READY_EVENT {
            info!(event_type = %event.event_type, "Ignoring webhook event");
            return Ok(WebhookAck::ignored());
        }

        let asset_id = event
            .data
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| VideoError::BadRequest("Missing asset id".to_string()))?;

        let playback_id = event
            .data
            .playback_ids
            .into_iter()
            .next()
            .and_then(|p| p.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| VideoError::BadRequest("Missing playback id".to_string()))?;

        let updated = state
            .videos
            .mark_ready(&asset_id, &playback_id)
            .await
            .map_err(VideoError::Database)?;

        match &updated {
            Some(video) => {
                info!(%asset_id, %playback_id, video_id = %video.id, "Video marked ready");
                Self::notify_ready(&state, video, &playback_id);
            }
            None => warn!(%asset_id, "Ready webhook matched no video record"),
        }

        Ok(WebhookAck {
            received: true,
            ignored: false,
            updated: updated.is_some(),
            asset_id: Some(asset_id),
            playback_id: Some(playback_id),
        })
    }

    pub async fn submit(state: AppState, req: SubmitVideoRequest) -> Result<Value, VideoError> {
        let req = req.trimmed();
        req.validate()
            .map_err(|e| VideoError::BadRequest(e.to_string()))?;

        let (Some(filename), Some(user_id)) = (req.filename, req.user_id) else {
            return Err(VideoError::BadRequest("filename and user_id are required".to_string()));
        };

        // Same key the upload relay wrote, so the provider fetches that object.
        let filename = object_key(&filename).map_err(|e| VideoError::BadRequest(e.to_string()))?;
        let source_url = public_object_url(&state.config.storage, &filename)?;
        info!(%user_id, %filename, %source_url, "Submitting video for processing");

        let body = state.provider.create_asset(source_url.as_str()).await?;

        let asset_id = provider_asset_id(&body)
            .ok_or_else(|| VideoError::Upstream("Provider response missing asset id".to_string()))?
            .to_string();

        let video = state
            .videos
            .create_processing(NewVideo {
                user_id,
                filename,
                source_url: source_url.to_string(),
                asset_id,
            })
            .await
            .map_err(VideoError::Database)?;

        info!(video_id = %video.id, asset_id = ?video.asset_id, "Video record created");
        Ok(body)
    }

    /// Asks the provider for the asset's state and brings a lagging record up
    /// to date when the provider already reports it ready.
    pub async fn poll_status(state: AppState, asset_id: String) -> Result<AssetStatusResponse, VideoError> {
        if asset_id.contains('/') || matches!(asset_id.trim(), "" | "." | "..") {
            return Err(VideoError::BadRequest(format!("Invalid asset id: {}", asset_id)));
        }

        let body = state.provider.get_asset(&asset_id).await?;

        let status = provider_asset_status(&body).unwrap_or("unknown").to_string();
        let playback_id = provider_playback_id(&body).map(str::to_string);

        let mut synced = false;
        if let (VideoStatus::Ready, Some(playback_id)) = (VideoStatus::from(status.as_str()), &playback_id) {
            let stored = state
                .videos
                .find_by_asset_id(&asset_id)
                .await
                .map_err(VideoError::Database)?;

            if stored.is_some_and(|video| video.status() != VideoStatus::Ready) {
                if let Some(video) = state
                    .videos
                    .mark_ready(&asset_id, playback_id)
                    .await
                    .map_err(VideoError::Database)?
                {
                    info!(%asset_id, %playback_id, "Video synced to ready from provider poll");
                    Self::notify_ready(&state, &video, playback_id);
                    synced = true;
                }
            }
        }

        Ok(AssetStatusResponse {
            asset_id,
            status,
            playback_id,
            synced,
        })
    }

    fn notify_ready(state: &AppState, video: &Video, playback_id: &str) {
        let asset_id = video.asset_id.as_deref().unwrap_or_default();
        let payload = NotificationPayload {
            title: Some("Your video is ready".to_string()),
            body: Some(format!("{} has finished processing", video.filename)),
            tag: Some(format!("video-{}", asset_id)),
            data: json!({
                "url": format!("/videos/{}", playback_id),
                "assetId": asset_id,
            })
            .as_object()
            .cloned(),
            ..Default::default()
        };

        if let Err(e) = state.push.push(&payload) {
            warn!(error = %e, %asset_id, "Failed to queue ready notification");
        }
    }
}
