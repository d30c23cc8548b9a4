//! Proxy frame lifecycle.
//!
//! The medium reaches the hub through a hidden frame pointing at the
//! hub origin. Rendering and removing that frame belong to the embedding
//! environment, behind [`ProxyHost`].

use std::sync::Arc;

use seance_protocol::transport::Transport;

/// Errors from the proxy host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    #[error("cannot render a proxy frame for {0}")]
    Unavailable(String),
}

/// Creates and destroys proxy frames.
pub trait ProxyHost: Send + Sync {
    /// Renders a frame for `target_origin` and returns the channel that
    /// posts into it.
    fn create(
        &self,
        target_origin: &str,
        frame_id: &str,
    ) -> Result<Arc<dyn Transport>, ProxyError>;

    /// Detaches the frame. Posting through its channel afterwards fails.
    fn destroy(&self, frame_id: &str);
}

/// A rendered proxy frame.
pub(crate) struct ProxyFrame {
    pub(crate) id: String,
    pub(crate) channel: Arc<dyn Transport>,
}
