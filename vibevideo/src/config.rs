use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use vibevideo_media::MediaApiConfig;
use vibevideo_persist::PersistenceConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub media_api: MediaApiConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub atlas_api_key: Option<String>,
    #[serde(default)]
    pub mongodb_uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the local session file; `~/.vibevideo` when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Short environment variables for the settings people change most
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("media_api.base_url", "MEDIA_API_BASE_URL"),
    ("media_api.max_upload_mb", "MEDIA_API_MAX_UPLOAD_MB"),
    ("persistence.backend", "PERSISTENCE_BACKEND"),
    ("persistence.atlas.api_url", "PERSISTENCE_ATLAS_API_URL"),
    ("session.dir", "SESSION_DIR"),
    ("logging.level", "LOG_LEVEL"),
    ("logging.format", "LOG_FORMAT"),
];

impl AppConfig {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. VIBEVIDEO_<SECTION>__<KEY> environment variables
    /// 4. MEDIA_API_BASE_URL, PERSISTENCE_BACKEND, LOG_LEVEL and friends
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from("config")
    }

    /// Same layering with the TOML files read from `dir`
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join(&env).to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("VIBEVIDEO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        for (key, var) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut cfg: AppConfig = builder.build()?.try_deserialize()?;

        // Missing secrets are not an error: persistence falls back to local-only
        cfg.atlas_api_key = std::env::var("ATLAS_API_KEY").ok().filter(|k| !k.is_empty());
        cfg.mongodb_uri = std::env::var("MONGODB_URI").ok().filter(|u| !u.is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}
