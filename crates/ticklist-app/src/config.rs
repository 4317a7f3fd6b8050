//! Application configuration read from the data directory.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use ticklist_hooks::HooksConfig;

const CONFIG_FILE: &str = "config.toml";

/// Application configuration loaded from `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct AppConfig {
    /// Feedback hook settings.
    #[serde(default)]
    pub hooks: HooksConfig,
}

impl AppConfig {
    /// Load configuration from a data directory. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, does not parse, or holds
    /// invalid values.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = data_dir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.hooks.timeout == 0 {
            bail!("hooks.timeout must be greater than zero");
        }
        Ok(())
    }
}
