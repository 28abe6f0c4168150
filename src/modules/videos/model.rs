use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Processing,
    Ready,
    Errored,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Processing => "processing",
            VideoStatus::Ready => "ready",
            VideoStatus::Errored => "errored",
        }
    }
}

impl From<&str> for VideoStatus {
    fn from(s: &str) -> Self {
        match s {
            "ready" => VideoStatus::Ready,
            "errored" => VideoStatus::Errored,
            _ => VideoStatus::Processing,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
pub struct Video {
    pub id: Uuid,
    pub user_id: String,
    pub filename: String,
    pub source_url: String,
    pub asset_id: Option<String>,
    pub playback_id: Option<String>,
    pub status: String, // Stored as string in DB
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl Video {
    pub fn status(&self) -> VideoStatus {
        VideoStatus::from(self.status.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub user_id: String,
    pub filename: String,
    pub source_url: String,
    pub asset_id: String,
}
