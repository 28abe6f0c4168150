//! In-process notification surface and view list.
//!
//! Each displayed notification settles exactly once: either clicked or
//! dismissed. Showing a notification replaces any displayed one sharing its tag.
//! Past the configured limits the oldest displayed notification and the
//! oldest view are evicted.

use super::host::{
    ApplicationView, DisplayedNotification, HostError, NotificationSurface, ViewHost, ViewKind,
};
use super::payload::NotificationOptions;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;
pub const DEFAULT_VIEW_LIMIT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationState {
    Displayed,
    Clicked,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Click,
    Dismiss,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
    #[error("notification not found")]
    NotFound,
    #[error("notification already {0:?}")]
    AlreadySettled(NotificationState),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationRecord {
    #[serde(flatten)]
    pub notification: DisplayedNotification,
    pub state: NotificationState,
}

pub struct MemoryView {
    url: String,
    focused: AtomicBool,
}

impl MemoryView {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            focused: AtomicBool::new(false),
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApplicationView for MemoryView {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn can_focus(&self) -> bool {
        true
    }

    async fn focus(&self) -> Result<(), HostError> {
        self.focused.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct Inner {
    notifications: Vec<NotificationRecord>,
    views: Vec<Arc<MemoryView>>,
}

pub struct MemoryHost {
    inner: Mutex<Inner>,
    can_open_window: bool,
    notification_limit: usize,
    view_limit: usize,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            can_open_window: true,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            view_limit: DEFAULT_VIEW_LIMIT,
        }
    }

    /// Limits below one are raised to one.
    pub fn with_limits(mut self, notifications: usize, views: usize) -> Self {
        self.notification_limit = notifications.max(1);
        self.view_limit = views.max(1);
        self
    }

    pub fn without_window_opening(mut self) -> Self {
        self.can_open_window = false;
        self
    }

    pub fn with_views<'a>(self, urls: impl IntoIterator<Item = &'a str>) -> Self {
        {
            let mut inner = self.inner.lock();
            inner.views.extend(urls.into_iter().map(|url| Arc::new(MemoryView::new(url))));
        }
        self
    }

    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.inner.lock().notifications.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<NotificationRecord> {
        self.inner
            .lock()
            .notifications
            .iter()
            .find(|record| record.notification.id == id)
            .cloned()
    }

    pub fn views(&self) -> Vec<Arc<MemoryView>> {
        self.inner.lock().views.clone()
    }

    /// Moves a displayed notification into its terminal state. A dismissed
    /// notification leaves the surface right away; a clicked one stays until
    /// the dispatcher closes it.
    pub fn begin_interaction(
        &self,
        id: Uuid,
        interaction: Interaction,
    ) -> Result<DisplayedNotification, InteractionError> {
        let mut inner = self.inner.lock();
        let index = inner
            .notifications
            .iter()
            .position(|record| record.notification.id == id)
            .ok_or(InteractionError::NotFound)?;

        let state = inner.notifications[index].state;
        if state != NotificationState::Displayed {
            return Err(InteractionError::AlreadySettled(state));
        }

        let notification = inner.notifications[index].notification.clone();
        match interaction {
            Interaction::Click => inner.notifications[index].state = NotificationState::Clicked,
            Interaction::Dismiss => {
                inner.notifications.remove(index);
            }
        }

        Ok(notification)
    }
}

#[async_trait]
impl NotificationSurface for MemoryHost {
    async fn show_notification(
        &self,
        title: &str,
        options: NotificationOptions,
    ) -> Result<DisplayedNotification, HostError> {
        let notification = DisplayedNotification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            options,
        };

        let mut inner = self.inner.lock();
        let before = inner.notifications.len();
        inner.notifications.retain(|record| {
            record.state != NotificationState::Displayed
                || record.notification.options.tag != notification.options.tag
        });
        if inner.notifications.len() != before {
            debug!(tag = %notification.options.tag, "Replaced notification with same tag");
        }

        inner.notifications.push(NotificationRecord {
            notification: notification.clone(),
            state: NotificationState::Displayed,
        });

        while inner.notifications.len() > self.notification_limit {
            let Some(oldest) = inner
                .notifications
                .iter()
                .position(|record| record.state == NotificationState::Displayed)
            else {
                break;
            };
            let evicted = inner.notifications.remove(oldest);
            debug!(id = %evicted.notification.id, tag = %evicted.notification.options.tag, "Evicted oldest notification");
        }

        Ok(notification)
    }

    fn close(&self, notification: &DisplayedNotification) {
        self.inner
            .lock()
            .notifications
            .retain(|record| record.notification.id != notification.id);
    }
}

#[async_trait]
impl ViewHost for MemoryHost {
    async fn match_all(&self, kind: ViewKind) -> Result<Vec<Arc<dyn ApplicationView>>, HostError> {
        match kind {
            ViewKind::Window => Ok(self
                .views()
                .into_iter()
                .map(|view| view as Arc<dyn ApplicationView>)
                .collect()),
        }
    }

    fn can_open_window(&self) -> bool {
        self.can_open_window
    }

    async fn open_window(&self, url: &str) -> Result<(), HostError> {
        info!(%url, "Opening window");
        let mut inner = self.inner.lock();
        inner.views.push(Arc::new(MemoryView::new(url)));
        if inner.views.len() > self.view_limit {
            let excess = inner.views.len() - self.view_limit;
            for view in inner.views.drain(..excess) {
                debug!(url = %view.url, "Closed oldest view");
            }
        }
        Ok(())
    }
}
