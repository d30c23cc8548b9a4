//! Outstanding request tracking.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use seance_protocol::envelope::Identifier;

/// Invoked with `(error, result)` when the matching response arrives.
pub type ResponseCallback = Box<dyn FnOnce(Option<String>, Value) + Send + 'static>;

/// Maps each outstanding request id to its callback, if any.
///
/// An id without a callback still occupies its slot until a response
/// bearing it arrives. Entries are single-use.
#[derive(Default)]
pub struct Correlator {
    pending: Mutex<HashMap<Identifier, Option<ResponseCallback>>>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: Identifier, cb: Option<ResponseCallback>) {
        self.lock().insert(id, cb);
    }

    /// Removes and returns the entry for `id`.
    ///
    /// `None` means the id is unknown (stale, duplicate or foreign);
    /// `Some(None)` means it was registered without a callback.
    pub fn take(&self, id: &Identifier) -> Option<Option<ResponseCallback>> {
        self.lock().remove(id)
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Identifier, Option<ResponseCallback>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn take_is_single_use() {
        let corr = Correlator::new();
        corr.register(Identifier::Seq(1), None);
        assert!(corr.contains(&Identifier::Seq(1)));

        assert!(matches!(corr.take(&Identifier::Seq(1)), Some(None)));
        assert!(corr.take(&Identifier::Seq(1)).is_none());
        assert!(corr.is_empty());
    }

    #[test]
    fn unknown_ids_yield_nothing() {
        let corr = Correlator::new();
        corr.register(Identifier::Seq(1), None);
        assert!(corr.take(&Identifier::Seq(2)).is_none());
        assert!(corr.take(&Identifier::Opaque("1".into())).is_none());
        assert_eq!(corr.len(), 1);
    }

    #[test]
    fn callback_is_returned_intact() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let corr = Correlator::new();
        corr.register(
            Identifier::Seq(3),
            Some(Box::new(move |err, result| {
                assert!(err.is_none());
                assert_eq!(result, serde_json::json!([{"k": "v"}]));
                c.fetch_add(1, Ordering::SeqCst);
            })),
        );

        let cb = corr.take(&Identifier::Seq(3)).flatten().unwrap();
        cb(None, serde_json::json!([{"k": "v"}]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
