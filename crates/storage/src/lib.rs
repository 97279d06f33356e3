pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod store;

pub use repository::identity::IdentityCache;
pub use store::{FileStore, KeyValueStore, MemoryStore};
