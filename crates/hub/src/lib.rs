//! Hub side of the Seance protocol.
//!
//! Owns the key/value store and a registry of incorporated mediums,
//! authenticates inbound envelopes by origin, routes them to registry
//! or store operations and emits correlated responses.

pub mod actions;
mod dispatcher;
pub mod embedding;
mod pump;
pub mod registry;
pub mod store;
pub mod types;

pub use dispatcher::Hub;
pub use embedding::EmbeddingContext;
pub use registry::{PeerRecord, PeerRegistry};
pub use store::{FileStore, MemoryStore, StoreAdapter, StoreError};
pub use types::HubConfig;

/// Errors produced while constructing or running a hub.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
