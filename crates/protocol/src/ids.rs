//! Monotonic local request ids.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::envelope::Identifier;

/// Issues request ids 1, 2, 3, ... for the lifetime of the source.
#[derive(Debug, Default)]
pub struct IdSource {
    last: AtomicU64,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the next id.
    pub fn next_id(&self) -> Identifier {
        Identifier::Seq(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
