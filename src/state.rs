use crate::config::settings::AppConfig;
use crate::infrastructure::provider::VideoProvider;
use crate::infrastructure::storage::ObjectStore;
use crate::modules::notifications::memory_host::MemoryHost;
use crate::modules::videos::repository::VideoStore;
use crate::workers::notifier::PushSender;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub videos: Arc<dyn VideoStore>,
    pub storage: Arc<dyn ObjectStore>,
    pub provider: Arc<dyn VideoProvider>,
    pub push: PushSender,
    pub host: Arc<MemoryHost>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn ObjectStore>,
        provider: Arc<dyn VideoProvider>,
        push: PushSender,
        host: Arc<MemoryHost>,
    ) -> Self {
        Self {
            config,
            videos,
            storage,
            provider,
            push,
            host,
        }
    }
}
