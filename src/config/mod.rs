mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration from `CONFIG_PATH` (or `config.yaml`).
///
/// An explicitly named file must exist. Without `CONFIG_PATH`, a missing
/// `config.yaml` falls back to the built-in defaults.
pub async fn load() -> Result<Config> {
    match env::var("CONFIG_PATH") {
        Ok(path) => load_from(&path).await,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from(DEFAULT_CONFIG_PATH).await,
        Err(_) => {
            debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
            Ok(Config::default())
        }
    }
}

pub async fn load_from(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;
    config.validate()?;

    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.handoff.host.trim().is_empty() {
            return Err(Error::config("handoff.host must not be empty"));
        }

        let recipient = &self.handoff.recipient;
        if recipient.is_empty() || !recipient.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::config(format!(
                "handoff.recipient must be a phone number made of digits only, got '{}'",
                recipient
            )));
        }

        Ok(())
    }
}
