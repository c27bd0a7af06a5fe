pub mod client;

pub use client::AtlasDataClient;
