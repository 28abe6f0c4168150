use std::env;
use std::str::FromStr;
use tracing::warn;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    StorageEndpoint,
    StorageBucket,
    StorageRegion,
    StorageAccessKey,
    StorageSecretKey,
    StoragePublicUrl,
    ProviderUrl,
    ProviderTokenId,
    ProviderTokenSecret,
    PushQueueCapacity,
    UploadMaxBytes,
    OpenWindows,
    NotificationLimit,
    ViewLimit,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::StorageEndpoint => "STORAGE_ENDPOINT",
            EnvKey::StorageBucket => "STORAGE_BUCKET",
            EnvKey::StorageRegion => "STORAGE_REGION",
            EnvKey::StorageAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::StorageSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::StoragePublicUrl => "STORAGE_PUBLIC_URL",
            EnvKey::ProviderUrl => "VIDEO_PROVIDER_URL",
            EnvKey::ProviderTokenId => "VIDEO_PROVIDER_TOKEN_ID",
            EnvKey::ProviderTokenSecret => "VIDEO_PROVIDER_TOKEN_SECRET",
            EnvKey::PushQueueCapacity => "PUSH_QUEUE_CAPACITY",
            EnvKey::UploadMaxBytes => "UPLOAD_MAX_BYTES",
            EnvKey::OpenWindows => "NOTIFICATION_OPEN_WINDOWS",
            EnvKey::NotificationLimit => "NOTIFICATION_LIMIT",
            EnvKey::ViewLimit => "NOTIFICATION_VIEW_LIMIT",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

/// Unset and blank values both read as `None`.
pub fn get_optional(key: EnvKey) -> Option<String> {
    env::var(key.as_str())
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    parse_or(key.as_str(), get(key).ok(), default, |raw| raw.parse().ok())
}

/// Booleans also accept `1`/`0`, `yes`/`no` and `on`/`off`.
pub fn get_flag(key: EnvKey, default: bool) -> bool {
    parse_or(key.as_str(), get(key).ok(), default, parse_flag)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match parse(raw.trim()) {
        Some(value) => value,
        None => {
            warn!(key = name, value = %raw, "Unparseable setting, using default");
            default
        }
    }
}
