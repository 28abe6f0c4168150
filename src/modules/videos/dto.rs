use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

pub const ASSET_READY_EVENT: &str = "video.asset.ready";

// --- WEBHOOK DTOs ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: WebhookAssetData,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct WebhookAssetData {
    pub id: Option<String>,
    #[serde(default)]
    pub playback_ids: Vec<PlaybackId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaybackId {
    pub id: Option<String>,
    pub policy: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct WebhookAck {
    pub received: bool,
    pub ignored: bool,
    pub updated: bool,
    pub asset_id: Option<String>,
    pub playback_id: Option<String>,
}

impl WebhookAck {
    pub fn ignored() -> Self {
        Self {
            received: true,
            ignored: true,
            updated: false,
            asset_id: None,
            playback_id: None,
        }
    }
}

// --- SUBMISSION DTOs ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitVideoRequest {
    #[serde(alias = "fileName")]
    #[validate(
        required(message = "filename is required"),
        length(min = 1, max = 1024, message = "filename must be 1-1024 characters")
    )]
    pub filename: Option<String>,
    #[serde(alias = "userId")]
    #[validate(
        required(message = "user_id is required"),
        length(min = 1, message = "user_id is required")
    )]
    pub user_id: Option<String>,
}

impl SubmitVideoRequest {
    /// Trims both fields; blank values count as missing.
    pub fn trimmed(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            filename: clean(self.filename),
            user_id: clean(self.user_id),
        }
    }
}

// --- STATUS DTOs ---

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetStatusResponse {
    pub asset_id: String,
    pub status: String,
    pub playback_id: Option<String>,
    /// True when this poll moved the stored record to ready.
    pub synced: bool,
}

/// `data.id` of a provider asset body.
pub fn provider_asset_id(body: &Value) -> Option<&str> {
    body.pointer("/data/id").and_then(Value::as_str)
}

pub fn provider_asset_status(body: &Value) -> Option<&str> {
    body.pointer("/data/status").and_then(Value::as_str)
}

pub fn provider_playback_id(body: &Value) -> Option<&str> {
    body.pointer("/data/playback_ids/0/id").and_then(Value::as_str)
}
