//! # Butter Configuration
//!
//! Explicit, validated configuration for the client and its draining
//! operations. The page size that bounds every batch call lives here as a
//! documented parameter rather than a constant buried at call sites.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use butter_core::config::ButterConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults, then ./butter.toml (or $BUTTER_CONFIG_PATH), then BUTTER_* env vars
//! let config = ButterConfig::load()?;
//!
//! println!("page size: {}", config.client.page_size);
//! # Ok(())
//! # }
//! ```

pub mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};

use crate::codec::MarshallOptions;
use crate::error::{ClientError, ClientResult};

/// Maximum number of entries the store accepts in one batch call
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Default transport timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButterConfig {
    pub client: ClientOptions,
    pub connection: ConnectionConfig,
}

/// Behavior of the client's draining and marshalling layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Page capacity used when a call does not supply its own
    pub page_size: usize,
    /// Upper bound on pages a single drain may submit (unbounded when unset)
    pub max_pages: Option<usize>,
    pub marshalling: MarshallOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
            marshalling: MarshallOptions::default(),
        }
    }
}

/// Parameters used to build a transport when no client handle is supplied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub keep_alive: bool,
    pub timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            keep_alive: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ConnectionConfig {
    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ClientResult<()> {
        match self.region.as_deref() {
            Some(region) if !region.trim().is_empty() => Ok(()),
            _ => Err(ClientError::config_error(
                "\"region\" is required when providing a connection configuration",
            )),
        }
    }
}

impl ClientOptions {
    pub fn validate(&self) -> ClientResult<()> {
        if self.page_size == 0 {
            return Err(ClientError::config_error("page_size must be greater than zero"));
        }
        if self.max_pages == Some(0) {
            return Err(ClientError::config_error(
                "max_pages must be greater than zero when set",
            ));
        }
        Ok(())
    }
}

impl ButterConfig {
    /// Validate client options; the connection section is only checked when
    /// it is actually used to build a transport
    pub fn validate(&self) -> ClientResult<()> {
        self.client.validate()
    }
}
