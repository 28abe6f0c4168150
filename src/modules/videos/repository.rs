use super::model::{NewVideo, Video, VideoStatus};
use crate::infrastructure::db::pool::DbPool;
use anyhow::{Result, anyhow};
use async_trait::async_trait;

#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn create_processing(&self, video: NewVideo) -> Result<Video>;

    /// `None` when no row carries `asset_id`.
    async fn mark_ready(&self, asset_id: &str, playback_id: &str) -> Result<Option<Video>>;

    async fn find_by_asset_id(&self, asset_id: &str) -> Result<Option<Video>>;
}

pub struct VideoRepository {
    pool: DbPool,
}

impl VideoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for VideoRepository {
    async fn create_processing(&self, video: NewVideo) -> Result<Video> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (user_id, filename, source_url, asset_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&video.user_id)
        .bind(&video.filename)
        .bind(&video.source_url)
        .bind(&video.asset_id)
        .bind(VideoStatus::Processing.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to create video record: {}", e))?;

        Ok(video)
    }

    async fn mark_ready(&self, asset_id: &str, playback_id: &str) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET status = $1, playback_id = $2, updated_at = NOW()
            WHERE asset_id = $3
            RETURNING *
            "#,
        )
        .bind(VideoStatus::Ready.as_str())
        .bind(playback_id)
        .bind(asset_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to update video record: {}", e))?;

        Ok(video)
    }

    async fn find_by_asset_id(&self, asset_id: &str) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE asset_id = $1")
            .bind(asset_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to fetch video record: {}", e))?;

        Ok(video)
    }
}
