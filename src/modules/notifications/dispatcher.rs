use super::host::{
    ApplicationView, HostError, NotificationClickEvent, NotificationCloseEvent, NotificationHost,
    NotificationSurface, PushEvent, ViewHost, ViewKind,
};
use super::lifetime::EventLifetime;
use super::payload::NotificationPayload;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of routing a click to an application view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRoute {
    Focused,
    Opened,
    Unavailable,
}

/// Turns push events into notifications and notification clicks into
/// view navigation. Holds no state between events.
pub struct NotificationDispatcher<H: ?Sized> {
    host: Arc<H>,
}

impl<H: ?Sized> Clone for NotificationDispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
        }
    }
}

impl<H> NotificationDispatcher<H>
where
    H: NotificationHost + ?Sized + 'static,
{
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    pub fn handle_push(&self, event: PushEvent, lifetime: &EventLifetime) {
        let Some(blob) = event.data else {
            debug!("Push event carried no data, nothing to show");
            return;
        };

        let payload = match NotificationPayload::decode(&blob) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, bytes = blob.len(), "Dropping malformed push payload");
                return;
            }
        };

        let (title, options) = payload.into_display();
        let host = self.host.clone();

        lifetime.wait_until(async move {
            match host.show_notification(&title, options).await {
                Ok(shown) => {
                    info!(id = %shown.id, tag = %shown.options.tag, "Notification displayed")
                }
                Err(e) => error!(error = %e, %title, "Host refused to show notification"),
            }
        });
    }

    pub fn handle_click(&self, event: NotificationClickEvent, lifetime: &EventLifetime) {
        let notification = event.notification;

        // Dismiss before any navigation is attempted.
        self.host.close(&notification);

        let Some(target) = notification.options.target_url().map(str::to_owned) else {
            debug!(id = %notification.id, "Clicked notification has no target url");
            return;
        };

        let host = self.host.clone();
        lifetime.wait_until(async move {
            match route_to_view(host.as_ref(), &target).await {
                Ok(route) => info!(%target, ?route, "Notification click routed"),
                Err(e) => warn!(error = %e, %target, "Failed to route notification click"),
            }
        });
    }

    pub fn handle_close(&self, event: NotificationCloseEvent) {
        info!(
            id = %event.notification.id,
            tag = %event.notification.options.tag,
            "Notification dismissed"
        );
    }
}

/// Focuses the first open window whose url equals `target`, otherwise asks
/// the host for a new window there.
pub async fn route_to_view<H>(host: &H, target: &str) -> Result<ViewRoute, HostError>
where
    H: ViewHost + ?Sized,
{
    let views = host.match_all(ViewKind::Window).await?;

    for view in views.iter().filter(|view| view.url() == target) {
        if view.can_focus() {
            view.focus().await?;
            return Ok(ViewRoute::Focused);
        }
    }

    if !host.can_open_window() {
        return Ok(ViewRoute::Unavailable);
    }

    host.open_window(target).await?;
    Ok(ViewRoute::Opened)
}
