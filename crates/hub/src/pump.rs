//! Hub event pump: the hub's `message` / `beforeunload` listeners.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use seance_protocol::transport::WindowEvent;

use crate::dispatcher::Hub;
use crate::store::StoreAdapter;

impl<S: StoreAdapter> Hub<S> {
    /// Processes window events until teardown, cancellation, or the
    /// event source closing.
    ///
    /// `BeforeUnload` broadcasts `CLOSE` to every peer before the pump
    /// exits; cancellation exits without broadcasting.
    pub async fn run(&mut self, mut events: mpsc::Receiver<WindowEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("hub pump cancelled");
                    break;
                }
                event = events.recv() => {
                    match event {
                        Some(WindowEvent::Message(msg)) => self.recv(&msg),
                        Some(WindowEvent::BeforeUnload) => {
                            self.before_destroy();
                            break;
                        }
                        Some(WindowEvent::Load) => {}
                        None => {
                            debug!("hub event source closed");
                            break;
                        }
                    }
                }
            }
        }
    }
}
