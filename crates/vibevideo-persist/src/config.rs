use serde::{Deserialize, Serialize};

/// Which document-database backend to talk to. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceBackend {
    /// Local-only operation
    #[default]
    None,
    /// Hosted Data API over HTTPS
    Atlas,
    /// Native driver (requires the `mongodb` feature)
    Mongodb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    pub api_url: String,
    pub database: String,
    pub data_source: String,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            database: "vibevideo_ai".to_string(),
            data_source: "Cluster0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            database: "vibevideo_ai".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub backend: PersistenceBackend,
    #[serde(default)]
    pub atlas: AtlasConfig,
    #[serde(default)]
    pub mongodb: MongoConfig,
    #[serde(default = "default_chat_limit")]
    pub chat_limit: i64,
    #[serde(default = "default_library_limit")]
    pub library_limit: i64,
}

fn default_chat_limit() -> i64 {
    50
}

fn default_library_limit() -> i64 {
    100
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: PersistenceBackend::None,
            atlas: AtlasConfig::default(),
            mongodb: MongoConfig::default(),
            chat_limit: default_chat_limit(),
            library_limit: default_library_limit(),
        }
    }
}
