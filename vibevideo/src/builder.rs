use std::sync::Arc;

use vibevideo_media::{HttpMediaClient, MediaProcessingClient};
use vibevideo_persist::{PersistenceBuilder, PersistenceClient};
use vibevideo_store::{ChatController, ConversationStore, FileSessionStorage, Persister, SessionStorage};

use crate::config::{AppConfig, SessionConfig};

/// Wires a [`ChatController`] from configuration.
///
/// Any collaborator can be swapped before `build()`; the rest come from the
/// config. A persistence backend that cannot be set up is logged and skipped
/// so the app still starts in local-only mode.
pub struct AppBuilder {
    config: AppConfig,
    media: Option<Arc<dyn MediaProcessingClient>>,
    persistence: Option<Arc<dyn PersistenceClient>>,
    session_storage: Option<Arc<dyn SessionStorage>>,
}

impl AppBuilder {
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            config,
            media: None,
            persistence: None,
            session_storage: None,
        }
    }

    pub fn with_media_client(mut self, client: Arc<dyn MediaProcessingClient>) -> Self {
        self.media = Some(client);
        self
    }

    pub fn with_persistence(mut self, client: Arc<dyn PersistenceClient>) -> Self {
        self.persistence = Some(client);
        self
    }

    pub fn with_session_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.session_storage = Some(storage);
        self
    }

    pub async fn build(self) -> anyhow::Result<ChatController> {
        let media = match self.media {
            Some(media) => media,
            None => {
                tracing::info!("Media API at {}", self.config.media_api.base_url);
                Arc::new(HttpMediaClient::new(self.config.media_api.clone())?)
            }
        };

        let persistence = match self.persistence {
            Some(client) => Some(client),
            None => connect_persistence(&self.config).await,
        };

        let session_storage = self
            .session_storage
            .unwrap_or_else(|| Arc::new(file_session_storage(&self.config.session)));

        let mut store = ConversationStore::new().with_session_storage(session_storage);
        if let Some(persister) = persistence.clone().and_then(Persister::spawn) {
            store = store.with_persister(persister);
        }

        let mut controller = ChatController::new(store, media);
        if let Some(client) = persistence {
            controller = controller.with_persistence(client);
        }

        if let Some(session) = controller.restore_session().await {
            tracing::info!("Resumed session for {}", session.username);
        }
        controller.store().lock().await.bootstrap();

        Ok(controller)
    }
}

async fn connect_persistence(config: &AppConfig) -> Option<Arc<dyn PersistenceClient>> {
    let mut builder = PersistenceBuilder::new(config.persistence.clone());
    if let Some(key) = &config.atlas_api_key {
        builder = builder.atlas_api_key(key.as_str());
    }
    if let Some(uri) = &config.mongodb_uri {
        builder = builder.mongodb_uri(uri.as_str());
    }

    match builder.build().await {
        Ok(Some(client)) => Some(client),
        Ok(None) => {
            tracing::info!("No persistence backend configured, running local-only");
            None
        }
        Err(e) => {
            tracing::warn!("Persistence unavailable, running local-only: {}", e);
            None
        }
    }
}

fn file_session_storage(config: &SessionConfig) -> FileSessionStorage {
    match &config.dir {
        Some(dir) => FileSessionStorage::new(dir.clone()),
        None => FileSessionStorage::in_home(),
    }
}
