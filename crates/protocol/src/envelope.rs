use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DESTROY_ID, MessageType};

/// Correlation id carried by every envelope.
///
/// Mediums issue sequence numbers; the hub echoes whatever it received,
/// so opaque string ids from foreign peers survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Seq(u64),
    Opaque(String),
}

impl Identifier {
    /// Returns `true` for the reserved shutdown-broadcast id.
    pub fn is_destroy(&self) -> bool {
        *self == DESTROY_ID
    }
}

impl From<u64> for Identifier {
    fn from(n: u64) -> Self {
        Self::Seq(n)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seq(n) => write!(f, "{n}"),
            Self::Opaque(s) => f.write_str(s),
        }
    }
}

/// Lenient view of any inbound envelope.
///
/// Every field is optional so that a malformed message still parses and
/// can be rejected by the receiving guard chain. JSON `null` reads as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Envelope {
    /// The parsed message type, if `type` names a known one.
    pub fn message_type(&self) -> Option<MessageType> {
        self.kind.as_deref().and_then(MessageType::parse)
    }

    /// Returns `true` if this is the hub's shutdown broadcast.
    pub fn is_close_broadcast(&self) -> bool {
        self.id.as_ref().is_some_and(Identifier::is_destroy)
            && self
                .result
                .as_ref()
                .is_some_and(|r| MessageType::Close.matches(r))
    }
}

/// Request shape, medium to hub: `{ sender, id, type, payload }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub sender: String,
    pub id: Identifier,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub payload: Value,
}

impl Request {
    pub fn new(
        sender: impl Into<String>,
        id: impl Into<Identifier>,
        kind: MessageType,
        payload: Value,
    ) -> Self {
        Self {
            sender: sender.into(),
            id: id.into(),
            kind,
            payload,
        }
    }
}

/// Response shape, hub to medium: `{ id, error, result }`.
///
/// Both `error` and `result` are always serialized, `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Identifier,
    pub error: Option<String>,
    pub result: Value,
}

impl Response {
    /// A successful response carrying `result`.
    pub fn ok(id: Identifier, result: Value) -> Self {
        Self {
            id,
            error: None,
            result,
        }
    }

    /// A failed response; `result` is forced to `null`.
    pub fn failed(id: Identifier, error: impl Into<String>) -> Self {
        Self {
            id,
            error: Some(error.into()),
            result: Value::Null,
        }
    }

    /// Heartbeat / mount acknowledgement for `id`.
    pub fn ack(id: Identifier) -> Self {
        Self::ok(id, Value::from(MessageType::Ack.as_str()))
    }

    /// The shutdown broadcast sent to every registered peer.
    pub fn close() -> Self {
        Self::ok(DESTROY_ID, Value::from(MessageType::Close.as_str()))
    }
}
