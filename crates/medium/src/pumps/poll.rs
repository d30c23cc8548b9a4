//! Heartbeat pump: periodic `SYN` towards the hub.
//!
//! Every heartbeat occupies a correlator entry until its `ACK` arrives.
//! Once the hub is gone (after `CLOSE`, or before it ever loads) none
//! arrives, so the pending map grows by one entry per interval until the
//! medium unmounts or is dropped.

use std::sync::{Arc, Weak};

use serde_json::Value;
use tracing::trace;

use seance_protocol::constants::MessageType;

use crate::correlator::ResponseCallback;
use crate::medium::Inner;

/// Emits a `SYN` every `conn_interval` until cancelled.
///
/// Each heartbeat carries an ack handler that marks the connection as
/// confirmed whenever it is invoked.
pub(crate) async fn poll_pump(inner: Arc<Inner>) {
    let mut interval = tokio::time::interval(inner.config.conn_interval);
    interval.tick().await; // Skip immediate first tick.

    loop {
        tokio::select! {
            _ = inner.cancel.cancelled() => break,
            _ = interval.tick() => {
                trace!(uuid = %inner.uuid, "heartbeat");
                inner.emit(
                    MessageType::Syn,
                    Value::from(inner.uuid.as_str()),
                    Some(ack_handler(Arc::downgrade(&inner))),
                );
            }
        }
    }
}

fn ack_handler(inner: Weak<Inner>) -> ResponseCallback {
    Box::new(move |_, _| {
        if let Some(inner) = inner.upgrade() {
            inner.acknowledge();
        }
    })
}
