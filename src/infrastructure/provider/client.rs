use super::{ProviderError, VideoProvider};
use crate::config::settings::ProviderConfig;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ProviderClient {
    http: Client,
    base_url: String,
    token_id: String,
    token_secret: String,
}

impl ProviderClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_id: config.token_id.clone(),
            token_secret: config.token_secret.clone(),
        })
    }

    fn assets_url(&self) -> String {
        format!("{}/video/v1/assets", self.base_url)
    }

    /// `<assets_url>/<asset_id>` with the id kept as a single path segment.
    fn asset_url(&self, asset_id: &str) -> Result<Url, ProviderError> {
        if matches!(asset_id.trim(), "" | "." | "..") {
            return Err(ProviderError::InvalidAssetId(asset_id.to_string()));
        }

        let mut url = Url::parse(&self.assets_url())?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidAssetId(asset_id.to_string()))?
            .pop_if_empty()
            .push(asset_id);
        Ok(url)
    }

    async fn read_body(response: Response) -> Result<Value, ProviderError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = rejection_message(&text);
            warn!(status = status.as_u16(), %message, "Provider rejected request");
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| ProviderError::Rejected {
            status: status.as_u16(),
            message: format!("unreadable provider response: {}", e),
        })
    }
}

#[async_trait]
impl VideoProvider for ProviderClient {
    async fn create_asset(&self, input_url: &str) -> Result<Value, ProviderError> {
        info!(%input_url, "Submitting asset to provider");

        let response = self
            .http
            .post(self.assets_url())
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .json(&json!({
                "input": [{ "url": input_url }],
                "playback_policy": ["public"],
            }))
            .send()
            .await?;

        Self::read_body(response).await
    }

    async fn get_asset(&self, asset_id: &str) -> Result<Value, ProviderError> {
        let url = self.asset_url(asset_id)?;
        let response = self
            .http
            .get(url)
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(asset_id.to_string()));
        }

        Self::read_body(response).await
    }
}

/// Error text from a provider error body (`{"error": {"messages": [...]}}`),
/// falling back to the raw body.
pub fn rejection_message(body: &str) -> String {
    let messages = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        let error = value.get("error")?;
        let joined = error
            .get("messages")?
            .as_array()?
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        (!joined.is_empty()).then_some(joined)
    });

    match messages {
        Some(messages) => messages,
        None if body.trim().is_empty() => "empty response from provider".to_string(),
        None => body.trim().to_string(),
    }
}
