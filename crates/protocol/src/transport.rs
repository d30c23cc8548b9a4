//! Transport and window-event abstractions.
//!
//! These stand in for `postMessage` and the `message` / `load` /
//! `beforeunload` listeners of a browsing context. A side subscribes by
//! running a pump over its [`WindowEvent`] receiver and unsubscribes by
//! letting that pump exit.

use serde_json::Value;

/// Errors from posting a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("target window has been detached")]
    Detached,

    #[error("send buffer full, message dropped")]
    Full,

    #[error("target window closed")]
    Closed,
}

/// Outbound half of a cross-origin channel.
pub trait Transport: Send + Sync {
    /// Posts serialized data to the window behind this transport.
    ///
    /// Delivery only happens when `target_origin` matches that window's
    /// origin (or is `"*"`); a mismatch is silently not delivered and
    /// still returns `Ok`.
    fn post(&self, data: String, target_origin: &str) -> Result<(), TransportError>;
}

/// Raw payload of a received message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageData {
    /// A serialized envelope.
    Text(String),
    /// Anything other than a string; never a valid envelope.
    Structured(Value),
}

/// A message as observed by the receiving window.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    /// Origin of the posting window.
    pub origin: String,
    pub data: Option<MessageData>,
}

impl Inbound {
    pub fn text(origin: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            data: Some(MessageData::Text(data.into())),
        }
    }

    /// The textual payload, treating an empty string as absent.
    pub fn text_data(&self) -> Option<&str> {
        match &self.data {
            Some(MessageData::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Events delivered to a browsing context.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    Message(Inbound),
    /// The page finished loading.
    Load,
    /// The page is about to be torn down.
    BeforeUnload,
}
