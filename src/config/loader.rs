use super::Config;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Layers configuration sources: defaults, then an optional TOML file, then
/// `D3_*` environment variables. CLI overrides are applied by the caller.
pub struct ConfigLoader {
    config: Config,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub async fn load_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        self.config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(())
    }

    pub fn merge_env_vars(&mut self) {
        self.config.merge_env_vars();
    }

    pub fn get_config(&self) -> Config {
        self.config.clone()
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Load the full layered configuration and validate it
    pub async fn load(path: Option<&Path>) -> Result<Config> {
        let mut loader = Self::new();
        if let Some(path) = path {
            loader.load_file(path).await?;
        }
        loader.merge_env_vars();

        let config = loader.into_config();
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
