//! The capability object handed out by [`Medium::sequence`](crate::Medium::sequence).

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;

use seance_protocol::constants::MessageType;

use crate::ClientError;
use crate::correlator::ResponseCallback;
use crate::medium::Inner;
use crate::validate;

/// Bound `get` / `set` / `delete` against one hub.
///
/// Each call validates its payload before anything reaches the wire and
/// returns the same handle, so calls chain:
///
/// ```ignore
/// api.set(json!([{"theme": "dark"}]), None)?
///    .get(json!(["theme"]), Some(cb))?;
/// ```
#[derive(Clone)]
pub struct Seance {
    inner: Arc<Inner>,
}

impl Seance {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Reads `keys`; the callback receives `[{key: value|null}, ...]`.
    pub fn get(&self, keys: Value, cb: Option<ResponseCallback>) -> Result<&Self, ClientError> {
        validate::keys(&keys)?;
        self.inner.emit(MessageType::Get, keys, cb);
        Ok(self)
    }

    /// Writes `[{key: value}, ...]`; the callback receives
    /// `[{key: true|false}, ...]`.
    pub fn set(&self, pairs: Value, cb: Option<ResponseCallback>) -> Result<&Self, ClientError> {
        validate::pairs(&pairs)?;
        self.inner.emit(MessageType::Set, pairs, cb);
        Ok(self)
    }

    /// Removes `keys`; the callback receives `[{key: true}, ...]`.
    pub fn delete(&self, keys: Value, cb: Option<ResponseCallback>) -> Result<&Self, ClientError> {
        validate::keys(&keys)?;
        self.inner.emit(MessageType::Delete, keys, cb);
        Ok(self)
    }
}

/// Sends one query through `api` and waits for its result.
///
/// Built on the capability's `get`, `set` and `delete`. There is no
/// timeout: if the hub never answers, neither does this.
pub async fn call(api: &Seance, kind: MessageType, payload: Value) -> Result<Value, ClientError> {
    let (tx, rx) = oneshot::channel();
    let cb: ResponseCallback = Box::new(move |error, result| {
        let _ = tx.send((error, result));
    });

    match kind {
        MessageType::Get => api.get(payload, Some(cb))?,
        MessageType::Set => api.set(payload, Some(cb))?,
        MessageType::Delete => api.delete(payload, Some(cb))?,
        other => {
            return Err(ClientError::Validation(format!(
                "{other} is not a query type"
            )));
        }
    };

    match rx.await {
        Ok((Some(error), _)) => Err(ClientError::Hub(error)),
        Ok((None, result)) => Ok(result),
        Err(_) => Err(ClientError::Closed),
    }
}
