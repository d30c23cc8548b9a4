//! Protocol traffic logger.

use serde_json::Value;

use crate::constants::MessageType;

/// Logs protocol events for one side of the channel.
///
/// Disabled by default. When enabled, heartbeat traffic (`SYN`
/// requests, `ACK` results) is suppressed unless `verbose` is set.
#[derive(Debug, Clone)]
pub struct ProtocolLogger {
    namespace: &'static str,
    enabled: bool,
    verbose: bool,
}

impl ProtocolLogger {
    pub fn new(namespace: &'static str, enabled: bool, verbose: bool) -> Self {
        Self {
            namespace,
            enabled,
            verbose,
        }
    }

    /// A logger that never emits.
    pub fn disabled(namespace: &'static str) -> Self {
        Self::new(namespace, false, false)
    }

    /// Returns `true` if `detail` would be emitted.
    pub fn should_log(&self, detail: &Value) -> bool {
        self.enabled && (self.verbose || !is_heartbeat(detail))
    }

    pub fn log(&self, event: &str, detail: &Value) {
        if !self.should_log(detail) {
            return;
        }
        tracing::info!(
            namespace = self.namespace,
            event = %event.to_uppercase(),
            detail = %detail,
            "protocol"
        );
    }
}

/// Returns `true` for heartbeat traffic.
fn is_heartbeat(detail: &Value) -> bool {
    detail
        .get("type")
        .is_some_and(|t| MessageType::Syn.matches(t))
        || detail
            .get("result")
            .is_some_and(|r| MessageType::Ack.matches(r))
}
