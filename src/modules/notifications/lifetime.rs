use std::future::Future;
use tokio_util::task::TaskTracker;

/// Keeps an inbound event alive until every side effect it started has
/// settled. Handlers register work with [`EventLifetime::wait_until`]; the
/// worker awaits [`EventLifetime::settled`] before releasing the event.
#[derive(Clone, Default)]
pub struct EventLifetime {
    tracker: TaskTracker,
}

impl EventLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_until<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(work);
    }

    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    pub async fn settled(self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
