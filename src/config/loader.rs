//! Configuration Loader
//!
//! Layered loading built on the `config` crate. Precedence (highest to lowest):
//! 1. `BUTTER_`-prefixed environment variables (`__` separates sections,
//!    e.g. `BUTTER_CLIENT__PAGE_SIZE=10`)
//! 2. TOML config file (`$BUTTER_CONFIG_PATH` or `./butter.toml`)
//! 3. Default values

use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ButterConfig;
use crate::error::{ClientError, ClientResult};

pub const ENV_PREFIX: &str = "BUTTER";
pub const CONFIG_PATH_ENV: &str = "BUTTER_CONFIG_PATH";
pub const DEFAULT_CONFIG_FILE: &str = "butter.toml";

/// Builder for a layered configuration load
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<(PathBuf, bool)>,
    env_prefix: Option<String>,
    env_source: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a TOML file over the defaults
    pub fn with_file(mut self, path: impl Into<PathBuf>, required: bool) -> Self {
        self.file = Some((path.into(), required));
        self
    }

    /// Layer prefixed environment variables over the file
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Read environment overrides from `vars` instead of the process environment
    pub fn with_env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    pub fn load(self) -> ClientResult<ButterConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&ButterConfig::default())?);

        if let Some((path, required)) = &self.file {
            debug!(path = %path.display(), required, "Loading butter config file");
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(*required),
            );
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(self.env_source.clone()),
            );
        }

        let config: ButterConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            page_size = config.client.page_size,
            max_pages = ?config.client.max_pages,
            region = ?config.connection.region,
            "Loaded butter configuration"
        );
        Ok(config)
    }
}

impl ButterConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> ClientResult<Self> {
        let loader = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => ConfigLoader::new().with_file(path, true),
            Err(_) => ConfigLoader::new().with_file(DEFAULT_CONFIG_FILE, false),
        };
        loader.with_env_prefix(ENV_PREFIX).load()
    }

    /// Load configuration from a specific file, then apply environment overrides
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        ConfigLoader::new()
            .with_file(path, true)
            .with_env_prefix(ENV_PREFIX)
            .load()
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::config_error(format!("Failed to create config directory: {e}"))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::config_error(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ClientError::config_error(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
