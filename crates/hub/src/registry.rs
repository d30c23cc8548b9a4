//! Peer registry: the candidate pool and the incorporated mediums.

use chrono::{DateTime, Utc};

/// An incorporated medium.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerRecord {
    pub origin: String,
    /// When the peer was incorporated.
    pub incorporated_at: DateTime<Utc>,
}

/// Registry of incorporated peers, keyed by origin.
///
/// An origin outside the candidate pool is never registered, and an
/// origin has at most one live record. Iteration follows incorporation
/// order.
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    pool: Vec<String>,
    peers: Vec<PeerRecord>,
}

impl PeerRegistry {
    /// Creates an empty registry over a fixed candidate pool.
    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            peers: Vec::new(),
        }
    }

    /// Returns `true` if `origin` is in the candidate pool.
    pub fn is_candidate(&self, origin: &str) -> bool {
        self.pool.iter().any(|o| o == origin)
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.peers.iter().any(|p| p.origin == origin)
    }

    pub fn get(&self, origin: &str) -> Option<&PeerRecord> {
        self.peers.iter().find(|p| p.origin == origin)
    }

    /// Registers `origin`. Returns `false` (and changes nothing) when it
    /// is not a candidate or is already registered.
    pub fn insert(&mut self, origin: &str) -> bool {
        if !self.is_candidate(origin) || self.contains(origin) {
            return false;
        }
        self.peers.push(PeerRecord {
            origin: origin.to_string(),
            incorporated_at: Utc::now(),
        });
        true
    }

    /// Removes the record for `origin`, if any.
    pub fn remove(&mut self, origin: &str) -> Option<PeerRecord> {
        let pos = self.peers.iter().position(|p| p.origin == origin)?;
        Some(self.peers.remove(pos))
    }

    /// Removes every record, in incorporation order.
    pub fn drain(&mut self) -> Vec<PeerRecord> {
        std::mem::take(&mut self.peers)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerRecord> {
        self.peers.iter()
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
