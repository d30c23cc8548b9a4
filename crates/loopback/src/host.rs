//! Proxy frame rendering over loopback windows.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use seance_medium::proxy::{ProxyError, ProxyHost};
use seance_protocol::transport::Transport;

use crate::port::Port;
use crate::window::Window;

/// Renders proxy frames for a medium living at `origin`.
///
/// Hub windows are registered up front; creating a frame for an origin
/// with no registered window fails the way an unreachable proxy would.
pub struct LoopbackHost {
    origin: String,
    hubs: Mutex<HashMap<String, Window>>,
    frames: Mutex<HashMap<String, Arc<Port>>>,
}

impl LoopbackHost {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            hubs: Mutex::new(HashMap::new()),
            frames: Mutex::new(HashMap::new()),
        }
    }

    /// Makes `window` reachable as a proxy target at its own origin.
    pub fn register_hub(&self, window: Window) {
        self.hubs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(window.origin().to_string(), window);
    }

    /// Number of frames currently rendered.
    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn has_frame(&self, frame_id: &str) -> bool {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(frame_id)
    }
}

impl ProxyHost for LoopbackHost {
    fn create(
        &self,
        target_origin: &str,
        frame_id: &str,
    ) -> Result<Arc<dyn Transport>, ProxyError> {
        let window = self
            .hubs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(target_origin)
            .cloned()
            .ok_or_else(|| ProxyError::Unavailable(target_origin.to_string()))?;

        let port = Arc::new(Port::new(&self.origin, window));
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(frame_id.to_string(), port.clone());
        debug!(frame_id, target = %target_origin, "proxy frame rendered");
        Ok(port)
    }

    fn destroy(&self, frame_id: &str) {
        let removed = self
            .frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(frame_id);
        if let Some(port) = removed {
            port.detach();
            debug!(frame_id, "proxy frame removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seance_protocol::transport::TransportError;

    #[test]
    fn create_requires_registered_hub() {
        let host = LoopbackHost::new("http://client");
        assert!(matches!(
            host.create("http://hub", "frame-1"),
            Err(ProxyError::Unavailable(origin)) if origin == "http://hub"
        ));
        assert_eq!(host.frame_count(), 0);
    }

    #[test]
    fn destroy_detaches_the_frame() {
        let host = LoopbackHost::new("http://client");
        let (hub, _rx) = Window::open("http://hub");
        host.register_hub(hub);

        let channel = host.create("http://hub", "frame-1").unwrap();
        assert!(host.has_frame("frame-1"));
        assert!(channel.post("x".into(), "http://hub").is_ok());

        host.destroy("frame-1");
        host.destroy("frame-1");
        assert_eq!(host.frame_count(), 0);
        assert!(matches!(
            channel.post("x".into(), "http://hub"),
            Err(TransportError::Detached)
        ));
    }
}
