//! Argument-shape checks for the public API.

use serde_json::Value;

use crate::ClientError;

fn invalid(msg: &str) -> ClientError {
    ClientError::Validation(msg.to_string())
}

pub fn must_be_array(arg: &Value) -> Result<&Vec<Value>, ClientError> {
    arg.as_array()
        .ok_or_else(|| invalid("The provided argument must be an array"))
}

pub fn must_be_str_or_num(arg: &Value) -> Result<(), ClientError> {
    if arg.is_string() || arg.is_number() {
        Ok(())
    } else {
        Err(invalid("All of the keyed arguments must be a string or number"))
    }
}

/// A `set` pair: an object whose values are strings or numbers.
///
/// An empty object passes; the hub rejects it for the whole batch.
pub fn has_valid_vals(arg: &Value) -> Result<(), ClientError> {
    let obj = arg
        .as_object()
        .ok_or_else(|| invalid("The provided indexed arguments must be objects"))?;
    if !obj.values().all(|v| v.is_string() || v.is_number()) {
        return Err(invalid(
            "The provided key/value pairs must be strings or numbers",
        ));
    }
    Ok(())
}

/// Validates a `get` / `delete` payload.
pub fn keys(arg: &Value) -> Result<(), ClientError> {
    must_be_array(arg)?.iter().try_for_each(must_be_str_or_num)
}

/// Validates a `set` payload.
pub fn pairs(arg: &Value) -> Result<(), ClientError> {
    must_be_array(arg)?.iter().try_for_each(has_valid_vals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_must_be_an_array() {
        assert!(keys(&json!("test")).is_err());
        assert!(keys(&json!(1)).is_err());
        assert!(keys(&json!({"k": 1})).is_err());
        assert!(keys(&json!(["v"])).is_ok());
        assert!(keys(&json!([])).is_ok());
    }

    #[test]
    fn keys_must_be_strings_or_numbers() {
        assert!(keys(&json!(["test", 1])).is_ok());
        assert!(keys(&json!([{"k": 1}, null])).is_err());
        assert!(keys(&json!([true])).is_err());
    }

    #[test]
    fn pairs_must_be_objects_of_scalars() {
        assert!(pairs(&json!([{"key": "val"}, {"key2": 2}])).is_ok());
        assert!(pairs(&json!(["key"])).is_err());
        assert!(pairs(&json!([{"key": {"nested": 1}}])).is_err());
        assert!(pairs(&json!([{"a": "1", "b": null}])).is_err());
        assert!(pairs(&json!([{}])).is_ok());
        assert!(pairs(&json!({"key": "val"})).is_err());
    }

    #[test]
    fn validation_messages() {
        let err = keys(&json!("x")).unwrap_err();
        assert_eq!(err.to_string(), "The provided argument must be an array");
        let err = keys(&json!([null])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "All of the keyed arguments must be a string or number"
        );
        let err = pairs(&json!([1])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The provided indexed arguments must be objects"
        );
    }
}
