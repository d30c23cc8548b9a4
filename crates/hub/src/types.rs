//! Public configuration types for the hub.

use serde::{Deserialize, Serialize};

use crate::HubError;

/// Hub configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Origins the hub is willing to incorporate.
    #[serde(default)]
    pub origins: Vec<String>,

    /// Log protocol traffic.
    #[serde(default)]
    pub logger: bool,

    /// Include heartbeat traffic in protocol logs.
    #[serde(default)]
    pub verbose: bool,
}

impl HubConfig {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origins: origins.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), HubError> {
        if let Some(pos) = self.origins.iter().position(|o| o.trim().is_empty()) {
            return Err(HubError::Config(format!("origin at index {pos} is empty")));
        }
        Ok(())
    }
}
