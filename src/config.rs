use crate::binding::{BUNDLED_ABI, DEFAULT_CONTRACT_ADDRESS, EndpointBinding};
use crate::error::ConfigError;
use alloy_primitives::Address;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:8545";

pub const ENV_NODE_URL: &str = "LEDGER_NODE_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "LEDGER_CONTRACT_ADDRESS";
pub const ENV_ABI_PATH: &str = "LEDGER_ABI_PATH";
pub const ENV_FROM: &str = "LEDGER_FROM";
pub const ENV_SUBMIT_TIMEOUT_MS: &str = "LEDGER_SUBMIT_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub node_url: String,
    pub contract_address: String,
    /// Interface description on disk; the bundled one is used when unset.
    pub abi_path: Option<PathBuf>,
    pub identity: Option<Address>,
    pub submit_timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            abi_path: None,
            identity: None,
            submit_timeout: None,
        }
    }
}

impl GatewayConfig {
    /// Reads the process environment after loading `.env`, if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let identity = get(ENV_FROM)
            .map(|v| {
                Address::from_str(&v).map_err(|_| ConfigError::InvalidSetting {
                    key: ENV_FROM,
                    reason: format!("`{}` is not an address", v),
                })
            })
            .transpose()?;

        let submit_timeout = get(ENV_SUBMIT_TIMEOUT_MS)
            .map(|v| match v.parse::<u64>() {
                Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
                _ => Err(ConfigError::InvalidSetting {
                    key: ENV_SUBMIT_TIMEOUT_MS,
                    reason: format!("`{}` is not a positive number of milliseconds", v),
                }),
            })
            .transpose()?;

        Ok(Self {
            node_url: get(ENV_NODE_URL).unwrap_or(defaults.node_url),
            contract_address: get(ENV_CONTRACT_ADDRESS).unwrap_or(defaults.contract_address),
            abi_path: get(ENV_ABI_PATH).map(PathBuf::from),
            identity,
            submit_timeout,
        })
    }

    pub fn binding(&self) -> Result<EndpointBinding, ConfigError> {
        match &self.abi_path {
            Some(path) => {
                let abi = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                EndpointBinding::from_abi_json(&self.contract_address, &abi)
            }
            None => EndpointBinding::from_abi_json(&self.contract_address, BUNDLED_ABI),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.node_url, "http://127.0.0.1:8545");
    }

    #[test]
    fn reads_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (ENV_NODE_URL, "http://10.0.0.5:8545"),
            (ENV_FROM, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            (ENV_SUBMIT_TIMEOUT_MS, "1500"),
            (ENV_CONTRACT_ADDRESS, "  "),
        ]))
        .unwrap();

        assert_eq!(config.node_url, "http://10.0.0.5:8545");
        assert!(config.identity.is_some());
        assert_eq!(config.submit_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.contract_address, DEFAULT_CONTRACT_ADDRESS);
    }

    #[test]
    fn rejects_bad_values() {
        let err = GatewayConfig::from_lookup(lookup(&[(ENV_SUBMIT_TIMEOUT_MS, "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                key: ENV_SUBMIT_TIMEOUT_MS,
                ..
            }
        ));

        let err = GatewayConfig::from_lookup(lookup(&[(ENV_FROM, "alice")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { key: ENV_FROM, .. }));
    }

    #[test]
    fn missing_abi_file_is_fatal() {
        let config = GatewayConfig {
            abi_path: Some(PathBuf::from("/nonexistent/LibraryManagement.json")),
            ..GatewayConfig::default()
        };
        assert!(matches!(config.binding(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn default_config_binds() {
        let binding = GatewayConfig::default().binding().unwrap();
        assert_eq!(
            binding.address(),
            Address::from_str(DEFAULT_CONTRACT_ADDRESS).unwrap()
        );
    }
}
