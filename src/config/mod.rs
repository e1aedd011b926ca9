mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads configuration from `CONFIG_PATH` (or `config.yaml`), then applies `HOST`/`PORT`.
///
/// A missing default `config.yaml` falls back to built-in defaults; a missing file named
/// explicitly through `CONFIG_PATH` is an error.
pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if explicit_path.is_none() && !Path::new(&config_path).exists() {
        debug!("No {} found, using built-in defaults", config_path);
        Config::default()
    } else {
        load_from_path(&config_path).await?
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    config.validate()?;

    Ok(config)
}

pub async fn load_from_path(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }

    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }

    Ok(())
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let model = &self.model;

        if model.crop_size == 0 {
            return Err(Error::config("model.crop_size must be greater than zero"));
        }

        if model.resize_shortest_edge < model.crop_size {
            return Err(Error::config(format!(
                "model.resize_shortest_edge ({}) must not be smaller than model.crop_size ({})",
                model.resize_shortest_edge, model.crop_size
            )));
        }

        if model.top_k == 0 {
            return Err(Error::config("model.top_k must be at least 1"));
        }

        if model.std.iter().any(|s| *s == 0.0) {
            return Err(Error::config("model.std must not contain zeros"));
        }

        Ok(())
    }
}
