//! Demo configuration.
//!
//! Read from the TOML file named by the first argument or by
//! `SEANCE_CONFIG`. A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use seance_hub::HubConfig;
use seance_medium::MediumConfig;

const DEFAULT_HUB_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_MEDIUM_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin the hub document is served from.
    #[serde(default = "default_hub_origin")]
    pub hub_origin: String,

    /// Origin of the page embedding the medium.
    #[serde(default = "default_medium_origin")]
    pub medium_origin: String,

    /// Persist the hub's store to this JSON file; in-memory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    #[serde(default = "default_hub")]
    pub hub: HubConfig,

    #[serde(default = "default_medium")]
    pub medium: MediumConfig,
}

fn default_hub_origin() -> String {
    DEFAULT_HUB_ORIGIN.into()
}

fn default_medium_origin() -> String {
    DEFAULT_MEDIUM_ORIGIN.into()
}

fn default_hub() -> HubConfig {
    HubConfig::new([DEFAULT_MEDIUM_ORIGIN])
}

fn default_medium() -> MediumConfig {
    MediumConfig::new(DEFAULT_HUB_ORIGIN)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hub_origin: default_hub_origin(),
            medium_origin: default_medium_origin(),
            store_path: None,
            hub: default_hub(),
            medium: default_medium(),
        }
    }
}

impl Config {
    /// Loads the configuration named on the command line or in the
    /// environment.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("SEANCE_CONFIG").map(PathBuf::from));

        match path {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.check()?;
        tracing::debug!(path = %path.display(), "configuration read");
        Ok(config)
    }

    /// The medium must point at the hub, and the hub must accept the
    /// medium's origin, or the demo cannot connect.
    pub fn check(&self) -> anyhow::Result<()> {
        if self.medium.seance_origin != self.hub_origin {
            anyhow::bail!(
                "medium.seance_origin ({}) does not match hub_origin ({})",
                self.medium.seance_origin,
                self.hub_origin
            );
        }
        if !self.hub.origins.iter().any(|o| o == &self.medium_origin) {
            tracing::warn!(
                medium = %self.medium_origin,
                "hub.origins does not include the medium origin, mounts will be ignored"
            );
        }
        Ok(())
    }
}
