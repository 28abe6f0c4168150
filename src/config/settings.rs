use serde::Deserialize;
use crate::config::env::{self, EnvKey};
use crate::modules::notifications::memory_host::{DEFAULT_NOTIFICATION_LIMIT, DEFAULT_VIEW_LIMIT};

pub const DEFAULT_PROVIDER_URL: &str = "https://api.mux.com";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub storage: StorageConfig,
    pub provider: ProviderConfig,
    pub push_queue_capacity: usize,
    pub upload_max_bytes: usize,
    /// Whether a click with no matching view may open a new one.
    pub open_windows: bool,
    pub notification_limit: usize,
    pub view_limit: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Explicit public base URL; wins over anything derived from `endpoint`.
    pub public_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub token_id: String,
    pub token_secret: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            storage: StorageConfig {
                endpoint: env::get_optional(EnvKey::StorageEndpoint),
                bucket: env::get(EnvKey::StorageBucket)?,
                region: env::get_or(EnvKey::StorageRegion, "us-east-1"),
                access_key: env::get(EnvKey::StorageAccessKey)?,
                secret_key: env::get(EnvKey::StorageSecretKey)?,
                public_url: env::get_optional(EnvKey::StoragePublicUrl),
            },
            provider: ProviderConfig {
                base_url: env::get_or(EnvKey::ProviderUrl, DEFAULT_PROVIDER_URL),
                token_id: env::get(EnvKey::ProviderTokenId)?,
                token_secret: env::get(EnvKey::ProviderTokenSecret)?,
            },
            push_queue_capacity: env::get_parsed(EnvKey::PushQueueCapacity, 64),
            upload_max_bytes: env::get_parsed(EnvKey::UploadMaxBytes, 128 * 1024 * 1024),
            open_windows: env::get_flag(EnvKey::OpenWindows, true),
            notification_limit: env::get_parsed(EnvKey::NotificationLimit, DEFAULT_NOTIFICATION_LIMIT),
            view_limit: env::get_parsed(EnvKey::ViewLimit, DEFAULT_VIEW_LIMIT),
        })
    }
}
