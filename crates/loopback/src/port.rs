//! Origin-checked one-way channel into a window.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use seance_protocol::transport::{Transport, TransportError};

use crate::window::Window;

/// Posts into `target` on behalf of `source_origin`.
#[derive(Debug)]
pub struct Port {
    source_origin: String,
    target: Window,
    detached: AtomicBool,
}

impl Port {
    pub fn new(source_origin: impl Into<String>, target: Window) -> Self {
        Self {
            source_origin: source_origin.into(),
            target,
            detached: AtomicBool::new(false),
        }
    }

    pub fn source_origin(&self) -> &str {
        &self.source_origin
    }

    pub fn target_origin(&self) -> &str {
        self.target.origin()
    }

    /// Cuts the port off; later posts fail with [`TransportError::Detached`].
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

impl Transport for Port {
    fn post(&self, data: String, target_origin: &str) -> Result<(), TransportError> {
        if self.is_detached() {
            return Err(TransportError::Detached);
        }
        if target_origin != "*" && target_origin != self.target.origin() {
            trace!(
                expected = %target_origin,
                actual = %self.target.origin(),
                "target origin mismatch, message not delivered"
            );
            return Ok(());
        }
        self.target.deliver(&self.source_origin, data)
    }
}
