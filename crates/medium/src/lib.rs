//! Medium: the store-consuming side of the Seance protocol.
//!
//! Embeds a proxy frame of the hub, keeps a heartbeat running against
//! it and correlates every request with its response. Callers obtain a
//! [`Seance`] capability from [`Medium::sequence`] once the hub has
//! confirmed the connection.

mod api;
pub mod correlator;
mod medium;
pub mod proxy;
mod pumps;
pub mod types;
pub mod validate;

pub use api::{Seance, call};
pub use correlator::{Correlator, ResponseCallback};
pub use medium::Medium;
pub use proxy::{ProxyError, ProxyHost};
pub use types::{ConnectionState, Lifecycle, LifecycleHook, MediumConfig};

/// Errors surfaced to medium callers.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Caller misuse; never sent over the wire.
    #[error("{0}")]
    Validation(String),

    #[error("seance storage instance at {origin} cannot be reached")]
    Unreachable { origin: String },

    #[error("connection to the seance has not been confirmed")]
    NotConnected,

    #[error("connection closed")]
    Closed,

    #[error("seance error: {0}")]
    Hub(String),

    #[error("proxy error: {0}")]
    Proxy(#[from] ProxyError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
