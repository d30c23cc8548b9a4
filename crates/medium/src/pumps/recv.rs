//! Window event pump for the medium.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use seance_protocol::transport::WindowEvent;

use crate::medium::Inner;

/// Feeds window events into the medium until unload or cancellation.
pub(crate) async fn recv_pump(inner: Arc<Inner>, mut events: mpsc::Receiver<WindowEvent>) {
    loop {
        tokio::select! {
            _ = inner.cancel.cancelled() => break,
            event = events.recv() => {
                match event {
                    Some(WindowEvent::Message(message)) => inner.recv(&message),
                    Some(WindowEvent::Load) => inner.mount(),
                    Some(WindowEvent::BeforeUnload) => {
                        inner.unmount();
                        break;
                    }
                    None => {
                        debug!(uuid = %inner.uuid, "window event source closed");
                        break;
                    }
                }
            }
        }
    }
}
