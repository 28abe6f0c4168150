use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod client;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("asset `{0}` not found at provider")]
    NotFound(String),
    #[error("invalid asset id `{0}`")]
    InvalidAssetId(String),
    #[error("invalid provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Video-processing provider. Bodies are passed through as raw JSON.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    async fn create_asset(&self, input_url: &str) -> Result<Value, ProviderError>;

    async fn get_asset(&self, asset_id: &str) -> Result<Value, ProviderError>;
}
