pub mod app_config;
pub mod auth;
pub mod http;
pub mod local;
pub mod memory;
pub mod rest;
pub mod storage;

pub use auth::AuthClient;
pub use http::BackendClient;
pub use local::FileLocalStore;
pub use memory::{Call, MemoryAuth, MemoryBackend, MemoryLocalStore};
pub use rest::RestClient;
pub use storage::StorageClient;
