//! Batch store operations behind the `GET`, `SET` and `DELETE` queries.
//!
//! Each operation reports per-key outcomes as an array of single-entry
//! objects, in payload order, and keeps going past a failed key. Only a
//! payload that cannot be read at all fails the whole batch.

use serde_json::{Map, Value};
use tracing::debug;

use crate::store::StoreAdapter;

/// Whole-batch failure; its `Display` is the wire error string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Reads each key; absent keys map to `null`, adapter failures to `false`.
pub fn get<S: StoreAdapter + ?Sized>(store: &S, payload: &Value) -> Result<Value, ActionError> {
    let keys = keys(payload)?;
    let result = keys
        .into_iter()
        .map(|key| {
            let value = match store.get(&key) {
                Ok(Some(v)) => Value::String(v),
                Ok(None) => Value::Null,
                Err(e) => {
                    debug!(key = %key, error = %e, "get failed");
                    Value::Bool(false)
                }
            };
            entry(key, value)
        })
        .collect();
    Ok(Value::Array(result))
}

/// Writes the first entry of each pair object, one result per pair;
/// `true` on success, `false` on failure or on a value that is not a
/// string or number.
pub fn set<S: StoreAdapter + ?Sized>(store: &mut S, payload: &Value) -> Result<Value, ActionError> {
    let pairs = payload
        .as_array()
        .ok_or_else(|| ActionError::InvalidPayload("expected an array of pairs".into()))?;

    // Validate the batch shape before touching the store.
    let mut writes = Vec::with_capacity(pairs.len());
    for (idx, pair) in pairs.iter().enumerate() {
        let obj = pair.as_object().ok_or_else(|| {
            ActionError::InvalidPayload(format!("pair at index {idx} is not an object"))
        })?;
        let first = obj.iter().next().ok_or_else(|| {
            ActionError::InvalidPayload(format!("pair at index {idx} has no entries"))
        })?;
        writes.push(first);
    }

    let result = writes
        .into_iter()
        .map(|(key, value)| {
            let ok = match scalar(value) {
                Some(v) => match store.set(key, &v) {
                    Ok(()) => true,
                    Err(e) => {
                        debug!(key = %key, error = %e, "set failed");
                        false
                    }
                },
                None => false,
            };
            entry(key.clone(), Value::Bool(ok))
        })
        .collect();
    Ok(Value::Array(result))
}

/// Deletes each key; `true` on success (including absent keys).
pub fn delete<S: StoreAdapter + ?Sized>(
    store: &mut S,
    payload: &Value,
) -> Result<Value, ActionError> {
    let keys = keys(payload)?;
    let result = keys
        .into_iter()
        .map(|key| {
            let ok = match store.delete(&key) {
                Ok(()) => true,
                Err(e) => {
                    debug!(key = %key, error = %e, "delete failed");
                    false
                }
            };
            entry(key, Value::Bool(ok))
        })
        .collect();
    Ok(Value::Array(result))
}

/// Extracts the key list of a `GET` or `DELETE` payload.
fn keys(payload: &Value) -> Result<Vec<String>, ActionError> {
    let arr = payload
        .as_array()
        .ok_or_else(|| ActionError::InvalidPayload("expected an array of keys".into()))?;
    arr.iter()
        .enumerate()
        .map(|(idx, k)| {
            scalar(k).ok_or_else(|| {
                ActionError::InvalidPayload(format!("key at index {idx} is not a string or number"))
            })
        })
        .collect()
}

/// String form of a string or number; `None` for anything else.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn entry(key: String, value: Value) -> Value {
    let mut obj = Map::with_capacity(1);
    obj.insert(key, value);
    Value::Object(obj)
}
