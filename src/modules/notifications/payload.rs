use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

pub const DEFAULT_TITLE: &str = "Event Reminder";
pub const DEFAULT_BODY: &str = "You have a new notification";
pub const DEFAULT_TAG: &str = "event-reminder";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("push payload is not a valid notification object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shape of a push message body. Every field is optional; missing ones are
/// filled in by [`NotificationPayload::into_display`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NotificationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(rename = "requireInteraction", skip_serializing_if = "Option::is_none")]
    pub require_interaction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Map<String, Value>>,
}

/// Options handed to the notification surface, defaults already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub tag: String,
    #[serde(rename = "requireInteraction")]
    pub require_interaction: bool,
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

impl NotificationOptions {
    /// Click target carried in `data.url`. Only non-empty strings count.
    pub fn target_url(&self) -> Option<&str> {
        self.data
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }
}

impl NotificationPayload {
    pub fn decode(blob: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(blob)?)
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn into_display(self) -> (String, NotificationOptions) {
        let title = self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let options = NotificationOptions {
            body: self.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            icon: self.icon,
            badge: self.badge,
            tag: self.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
            require_interaction: self.require_interaction.unwrap_or(false),
            data: self.data.unwrap_or_default(),
        };
        (title, options)
    }
}
