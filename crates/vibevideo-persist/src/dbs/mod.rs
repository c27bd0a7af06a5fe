pub mod atlas;
#[cfg(feature = "mongodb")]
pub mod mongo;
