use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::envelope::Identifier;

/// Heartbeat period, also used as the delay between `sequence` attempts.
pub const CONN_INTERVAL: Duration = Duration::from_millis(1000);

/// Total resolver attempts made by `sequence` before giving up.
pub const MAX_CONN_ATTEMPTS: u32 = 10;

/// Reserved id for the unsolicited shutdown broadcast.
///
/// Sequence ids start at 1, so this value is never issued for a
/// correlated request.
pub const DESTROY_ID: Identifier = Identifier::Seq(0);

/// Protocol message type identifier.
///
/// `ACK` and `CLOSE` never appear as a request `type`; they travel in
/// the `result` field of a response as sentinel signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    // Lifecycle
    Mount,
    Unmount,

    // Heartbeat
    Syn,
    Ack,

    // Hub shutdown
    Close,

    // Queries
    Get,
    Set,
    Delete,
}

impl MessageType {
    /// Wire representation of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "MOUNT",
            Self::Unmount => "UNMOUNT",
            Self::Syn => "SYN",
            Self::Ack => "ACK",
            Self::Close => "CLOSE",
            Self::Get => "GET",
            Self::Set => "SET",
            Self::Delete => "DELETE",
        }
    }

    /// Parses a wire type string. Matching is exact (case-sensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MOUNT" => Some(Self::Mount),
            "UNMOUNT" => Some(Self::Unmount),
            "SYN" => Some(Self::Syn),
            "ACK" => Some(Self::Ack),
            "CLOSE" => Some(Self::Close),
            "GET" => Some(Self::Get),
            "SET" => Some(Self::Set),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Returns `true` for the store query kinds (`GET`, `SET`, `DELETE`).
    pub fn is_query(self) -> bool {
        matches!(self, Self::Get | Self::Set | Self::Delete)
    }

    /// Returns `true` if `value` is this type's sentinel string.
    pub fn matches(self, value: &serde_json::Value) -> bool {
        value.as_str() == Some(self.as_str())
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
