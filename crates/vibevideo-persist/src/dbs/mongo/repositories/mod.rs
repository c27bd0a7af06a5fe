pub mod chat;
pub mod library;
pub mod user;

pub use chat::MongoChatRepository;
pub use library::MongoLibraryRepository;
pub use user::MongoUserRepository;
