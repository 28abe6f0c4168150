use crate::config::settings::StorageConfig;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Last-resort public base when neither an explicit base nor a usable
/// endpoint is configured.
pub const FALLBACK_PUBLIC_BASE: &str = "http://localhost:9000/videos";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PublicUrlError {
    #[error("object key is empty")]
    EmptyKey,
    #[error("invalid object key `{0}`")]
    InvalidKey(String),
    #[error("invalid public base url `{base}`: {reason}")]
    InvalidBase { base: String, reason: String },
    #[error("public url must be http or https, got `{0}`")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSource {
    Explicit,
    Endpoint,
    Fallback,
}

/// Picks the public base: explicit setting, then `<endpoint>/<bucket>`, then
/// [`FALLBACK_PUBLIC_BASE`].
pub fn resolve_base(config: &StorageConfig) -> (String, BaseSource) {
    if let Some(base) = config.public_url.as_deref().filter(|b| !b.trim().is_empty()) {
        return (base.trim().to_string(), BaseSource::Explicit);
    }

    let derived = config
        .endpoint
        .as_deref()
        .and_then(|endpoint| Url::parse(endpoint.trim()).ok())
        .filter(|url| is_http(url) && url.host_str().is_some())
        .map(|url| {
            format!(
                "{}/{}",
                url.as_str().trim_end_matches('/'),
                config.bucket.trim_matches('/')
            )
        });

    match derived {
        Some(base) => (base, BaseSource::Endpoint),
        None => (FALLBACK_PUBLIC_BASE.to_string(), BaseSource::Fallback),
    }
}

/// Turns a client-supplied filename into the storage key used for both the
/// upload and the public url. Empty and dot segments are refused.
pub fn object_key(filename: &str) -> Result<String, PublicUrlError> {
    let key = filename.trim().trim_start_matches('/');
    if key.is_empty() {
        return Err(PublicUrlError::EmptyKey);
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(PublicUrlError::InvalidKey(filename.to_string()));
    }
    Ok(key.to_string())
}

pub fn public_object_url(config: &StorageConfig, key: &str) -> Result<Url, PublicUrlError> {
    let key = key.trim_matches('/');
    if key.is_empty() {
        return Err(PublicUrlError::EmptyKey);
    }

    let (base, source) = resolve_base(config);
    debug!(%base, ?source, "Resolved public storage base");

    let mut url = Url::parse(&base).map_err(|e| PublicUrlError::InvalidBase {
        base: base.clone(),
        reason: e.to_string(),
    })?;

    if !is_http(&url) {
        return Err(PublicUrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    url.path_segments_mut()
        .map_err(|_| PublicUrlError::InvalidBase {
            base: base.clone(),
            reason: "cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(key.split('/').filter(|segment| !segment.is_empty()));

    Ok(url)
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
