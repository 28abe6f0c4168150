//! Seams between the dispatcher and the environment hosting it.
//!
//! The host owns the notification surface and the list of application views.
//! The dispatcher only ever *requests* actions through these traits.

use super::payload::NotificationOptions;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("notification permission denied")]
    PermissionDenied,
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DisplayedNotification {
    pub id: Uuid,
    pub title: String,
    pub options: NotificationOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Window,
}

#[derive(Debug, Clone, Default)]
pub struct PushEvent {
    pub data: Option<Bytes>,
}

#[derive(Debug, Clone)]
pub struct NotificationClickEvent {
    pub notification: DisplayedNotification,
}

#[derive(Debug, Clone)]
pub struct NotificationCloseEvent {
    pub notification: DisplayedNotification,
}

#[async_trait]
pub trait NotificationSurface: Send + Sync {
    async fn show_notification(
        &self,
        title: &str,
        options: NotificationOptions,
    ) -> Result<DisplayedNotification, HostError>;

    fn close(&self, notification: &DisplayedNotification);
}

#[async_trait]
pub trait ApplicationView: Send + Sync {
    fn url(&self) -> String;

    fn can_focus(&self) -> bool;

    async fn focus(&self) -> Result<(), HostError>;
}

#[async_trait]
pub trait ViewHost: Send + Sync {
    /// Views in whatever order the host keeps them.
    async fn match_all(&self, kind: ViewKind) -> Result<Vec<Arc<dyn ApplicationView>>, HostError>;

    fn can_open_window(&self) -> bool;

    async fn open_window(&self, url: &str) -> Result<(), HostError>;
}

pub trait NotificationHost: NotificationSurface + ViewHost {}

impl<T: NotificationSurface + ViewHost> NotificationHost for T {}
