pub mod models;
pub mod config;
pub mod error;
pub mod trait_client;
pub mod dbs;
pub mod builder;

pub use models::{ChatDocument, LibraryItemDocument, LoginResult, UserAccount};
pub use config::{AtlasConfig, MongoConfig, PersistenceBackend, PersistenceConfig};
pub use error::PersistError;
pub use trait_client::PersistenceClient;
pub use dbs::atlas::AtlasDataClient;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
pub use builder::PersistenceBuilder;
