use std::sync::Arc;

use crate::config::{PersistenceBackend, PersistenceConfig};
use crate::dbs::atlas::AtlasDataClient;
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

/// Picks and connects the configured backend. Secrets are passed in
/// separately from the file-based config.
pub struct PersistenceBuilder {
    config: PersistenceConfig,
    atlas_api_key: Option<String>,
    mongodb_uri: Option<String>,
}

impl PersistenceBuilder {
    pub fn new(config: PersistenceConfig) -> Self {
        Self {
            config,
            atlas_api_key: None,
            mongodb_uri: None,
        }
    }

    pub fn atlas_api_key(mut self, key: impl Into<String>) -> Self {
        self.atlas_api_key = Some(key.into());
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    /// `Ok(None)` means local-only operation was requested
    pub async fn build(self) -> Result<Option<Arc<dyn PersistenceClient>>> {
        let PersistenceConfig {
            backend,
            atlas,
            chat_limit,
            library_limit,
            ..
        } = &self.config;

        match backend {
            PersistenceBackend::None => Ok(None),
            PersistenceBackend::Atlas => {
                let api_key = self
                    .atlas_api_key
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| PersistError::NotConfigured("ATLAS_API_KEY is not set".to_string()))?;
                let client = AtlasDataClient::new(atlas, api_key)?.with_limits(*chat_limit, *library_limit);
                tracing::info!("Persistence backend: Data API at {}", atlas.api_url);
                Ok(Some(Arc::new(client)))
            }
            PersistenceBackend::Mongodb => self.build_mongo().await,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongo(&self) -> Result<Option<Arc<dyn PersistenceClient>>> {
        use crate::dbs::mongo::MongoPersistenceClient;

        let uri = self
            .mongodb_uri
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| PersistError::NotConfigured("MONGODB_URI is not set".to_string()))?;
        let client = MongoPersistenceClient::connect(uri, &self.config.mongodb)
            .await?
            .with_limits(self.config.chat_limit, self.config.library_limit);
        tracing::info!("Persistence backend: MongoDB database {}", self.config.mongodb.database);
        Ok(Some(Arc::new(client)))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongo(&self) -> Result<Option<Arc<dyn PersistenceClient>>> {
        Err(PersistError::NotConfigured(
            "built without the `mongodb` feature".to_string(),
        ))
    }
}
