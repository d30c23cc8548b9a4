//! Public types for the medium.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use seance_protocol::constants::{CONN_INTERVAL, MAX_CONN_ATTEMPTS};

use crate::ClientError;

/// The medium's belief about whether the hub is reachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No heartbeat acknowledged yet, or the hub announced shutdown.
    #[default]
    Disconnected,
    /// A heartbeat or mount was acknowledged.
    Connected,
}

/// Medium configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediumConfig {
    /// Full origin of the hub to connect to.
    pub seance_origin: String,

    /// Heartbeat period and delay between connection attempts.
    #[serde(
        rename = "conn_interval_ms",
        default = "default_conn_interval",
        with = "duration_ms"
    )]
    pub conn_interval: Duration,

    /// Total attempts made by `sequence` before giving up.
    #[serde(default = "default_max_conn_attempts")]
    pub max_conn_attempts: u32,

    /// Log protocol traffic.
    #[serde(default)]
    pub logger: bool,

    /// Include heartbeat traffic in protocol logs.
    #[serde(default)]
    pub verbose: bool,
}

fn default_conn_interval() -> Duration {
    CONN_INTERVAL
}

fn default_max_conn_attempts() -> u32 {
    MAX_CONN_ATTEMPTS
}

impl MediumConfig {
    pub fn new(seance_origin: impl Into<String>) -> Self {
        Self {
            seance_origin: seance_origin.into(),
            conn_interval: default_conn_interval(),
            max_conn_attempts: default_max_conn_attempts(),
            logger: false,
            verbose: false,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.seance_origin.trim().is_empty() {
            return Err(ClientError::Config("seance origin is empty".into()));
        }
        if self.max_conn_attempts == 0 {
            return Err(ClientError::Config(
                "max_conn_attempts must be at least 1".into(),
            ));
        }
        if self.conn_interval.is_zero() {
            return Err(ClientError::Config("conn_interval must be non-zero".into()));
        }
        Ok(())
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Callback receiving the medium's UUID.
pub type LifecycleHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Hooks fired when the medium mounts and unmounts. Both default to no-ops.
#[derive(Clone)]
pub struct Lifecycle {
    pub created: LifecycleHook,
    pub destroyed: LifecycleHook,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            created: Arc::new(|_| {}),
            destroyed: Arc::new(|_| {}),
        }
    }
}

impl Lifecycle {
    pub fn on_created(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.created = Arc::new(f);
        self
    }

    pub fn on_destroyed(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.destroyed = Arc::new(f);
        self
    }
}
