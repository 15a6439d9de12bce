/*
[INPUT]:  Optional YAML settings file + TASKBOARD_* environment variables
[OUTPUT]: Validated client settings
[POS]:    Configuration layer - backend origin, timeouts, storage location
[UPDATE]: When adding new settings
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use taskboard_adapter::ClientConfig;
use taskboard_adapter::http::client::DEFAULT_BASE_URL;
use tracing::debug;

use crate::connectivity::ProbeConfig;
use crate::error::{ClientError, Result};

const ENV_PREFIX: &str = "TASKBOARD";

/// Settings for one client instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Backend origin, e.g. `http://localhost:5000`
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Period between connectivity probes
    pub probe_interval_secs: u64,
    /// Bound applied to each individual probe request
    pub probe_timeout_secs: u64,
    /// Where notepad data lives; platform data dir when unset
    pub storage_dir: Option<PathBuf>,
    pub notification_capacity: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            probe_interval_secs: 30,
            probe_timeout_secs: 5,
            storage_dir: None,
            notification_capacity: 64,
        }
    }
}

impl ClientSettings {
    /// Defaults, then the optional file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "reading settings file");
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }
        // Field names contain underscores, so no nesting separator is configured.
        builder = builder.add_source(env.prefix_separator("_").try_parsing(true));

        let settings: ClientSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|err| ClientError::Config(format!("invalid base_url {:?}: {err}", self.base_url)))?;
        if self.connect_timeout_secs == 0 {
            return Err(ClientError::Config("connect_timeout_secs must be > 0".to_string()));
        }
        if self.probe_interval_secs == 0 {
            return Err(ClientError::Config("probe_interval_secs must be > 0".to_string()));
        }
        if self.probe_timeout_secs == 0 {
            return Err(ClientError::Config("probe_timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: None,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            interval: Duration::from_secs(self.probe_interval_secs),
            timeout: Duration::from_secs(self.probe_timeout_secs),
        }
    }

    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("taskboard"))
            .ok_or_else(|| ClientError::Config("no platform data directory; set storage_dir".to_string()))
    }
}
