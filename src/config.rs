//! Simulator configuration
//!
//! Read from the environment:
//! - `ETHEREUM_RPC_URL`: JSON-RPC endpoint, `http(s)://` or `ws(s)://` (required)
//! - `RPC_TIMEOUT_MS`: per-request deadline in milliseconds (default 10000)

use std::time::Duration;

use crate::errors::ConfigError;

pub const RPC_URL_ENV: &str = "ETHEREUM_RPC_URL";
pub const RPC_TIMEOUT_ENV: &str = "RPC_TIMEOUT_MS";

/// Default per-request deadline
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Node endpoint
    pub rpc_url: String,
    /// Deadline applied to every RPC request
    pub request_timeout: Duration,
}

impl SimulatorConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Load configuration from the process environment
    ///
    /// # Returns
    /// * `Ok(SimulatorConfig)` - Loaded configuration
    /// * `Err(ConfigError)` - If `ETHEREUM_RPC_URL` is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = lookup(RPC_URL_ENV)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingRpcUrl)?;

        let request_timeout = match lookup(RPC_TIMEOUT_ENV) {
            Some(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    name: RPC_TIMEOUT_ENV,
                    value: raw.clone(),
                })?;
                Duration::from_millis(millis)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            rpc_url,
            request_timeout,
        })
    }
}
