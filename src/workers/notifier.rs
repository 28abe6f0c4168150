use crate::modules::notifications::dispatcher::NotificationDispatcher;
use crate::modules::notifications::host::{
    DisplayedNotification, NotificationClickEvent, NotificationCloseEvent, NotificationHost,
    PushEvent,
};
use crate::modules::notifications::lifetime::EventLifetime;
use crate::modules::notifications::payload::NotificationPayload;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum DispatchEvent {
    Push(PushEvent),
    Click(NotificationClickEvent),
    Close(NotificationCloseEvent),
}

impl DispatchEvent {
    fn kind(&self) -> &'static str {
        match self {
            DispatchEvent::Push(_) => "push",
            DispatchEvent::Click(_) => "click",
            DispatchEvent::Close(_) => "close",
        }
    }
}

#[derive(Debug, Error)]
pub enum EnqueueError {
    #[error("failed to encode push payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("notification queue is full")]
    Full,
    #[error("notification worker has stopped")]
    Closed,
}

/// Producer side of the dispatcher queue.
#[derive(Clone)]
pub struct PushSender {
    tx: mpsc::Sender<DispatchEvent>,
}

impl PushSender {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<DispatchEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn push(&self, payload: &NotificationPayload) -> Result<(), EnqueueError> {
        let blob = Bytes::from(payload.encode()?);
        self.enqueue(DispatchEvent::Push(PushEvent { data: Some(blob) }))
    }

    pub fn click(&self, notification: DisplayedNotification) -> Result<(), EnqueueError> {
        self.enqueue(DispatchEvent::Click(NotificationClickEvent { notification }))
    }

    pub fn close(&self, notification: DisplayedNotification) -> Result<(), EnqueueError> {
        self.enqueue(DispatchEvent::Close(NotificationCloseEvent { notification }))
    }

    fn enqueue(&self, event: DispatchEvent) -> Result<(), EnqueueError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => EnqueueError::Full,
            mpsc::error::TrySendError::Closed(_) => EnqueueError::Closed,
        })
    }
}

/// Drains the queue one event at a time. Each event stays alive until all
/// work it registered on its [`EventLifetime`] has finished.
pub async fn start_notification_worker<H>(
    dispatcher: NotificationDispatcher<H>,
    mut rx: mpsc::Receiver<DispatchEvent>,
) where
    H: NotificationHost + ?Sized + 'static,
{
    info!("🔔 Notification worker listening");

    while let Some(event) = rx.recv().await {
        let kind = event.kind();
        debug!(kind, "Dispatching notification event");

        let lifetime = EventLifetime::new();
        match event {
            DispatchEvent::Push(push) => dispatcher.handle_push(push, &lifetime),
            DispatchEvent::Click(click) => dispatcher.handle_click(click, &lifetime),
            DispatchEvent::Close(close) => dispatcher.handle_close(close),
        }

        let pending = lifetime.pending();
        lifetime.settled().await;
        debug!(kind, pending, "Notification event settled");
    }

    warn!("Notification queue closed, worker stopping");
}
