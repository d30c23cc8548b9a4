//! Window handles and their event queues.

use tokio::sync::mpsc;
use tracing::warn;

use seance_protocol::transport::{Inbound, TransportError, WindowEvent};

/// Capacity of every window's event queue.
pub const WINDOW_QUEUE_CAPACITY: usize = 256;

/// Sending half of a window: its origin and its event queue.
#[derive(Debug, Clone)]
pub struct Window {
    origin: String,
    tx: mpsc::Sender<WindowEvent>,
}

impl Window {
    /// Opens a window at `origin`; the receiver is what its pump consumes.
    pub fn open(origin: impl Into<String>) -> (Self, mpsc::Receiver<WindowEvent>) {
        let (tx, rx) = mpsc::channel(WINDOW_QUEUE_CAPACITY);
        (
            Self {
                origin: origin.into(),
                tx,
            },
            rx,
        )
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns `true` once the receiving pump has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Signals that the document finished loading.
    pub fn load(&self) -> Result<(), TransportError> {
        self.dispatch(WindowEvent::Load)
    }

    /// Signals that the document is about to be torn down.
    pub fn before_unload(&self) -> Result<(), TransportError> {
        self.dispatch(WindowEvent::BeforeUnload)
    }

    /// Delivers a message event as if posted from `source_origin`.
    pub fn deliver(
        &self,
        source_origin: &str,
        data: impl Into<String>,
    ) -> Result<(), TransportError> {
        self.dispatch(WindowEvent::Message(Inbound::text(source_origin, data)))
    }

    pub(crate) fn dispatch(&self, event: WindowEvent) -> Result<(), TransportError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                warn!(origin = %self.origin, "window queue full, event dropped");
                TransportError::Full
            }
            mpsc::error::TrySendError::Closed(_) => TransportError::Closed,
        })
    }
}
