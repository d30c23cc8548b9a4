//! Envelope serialization to and from the transport string.

use serde::Serialize;

use crate::envelope::Envelope;

/// Errors from encoding or decoding an envelope.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializes an outbound envelope to its wire string.
pub fn serialize<T: Serialize>(envelope: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(envelope)?)
}

/// Deserializes a wire string into the lenient [`Envelope`] view.
///
/// Fails on invalid JSON and on JSON that is not an object.
pub fn deserialize(data: &str) -> Result<Envelope, CodecError> {
    Ok(serde_json::from_str(data)?)
}
