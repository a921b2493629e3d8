pub mod networks;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use networks::{NetworkInfo, NetworkRegistry};

use crate::agent::GasSettings;
use crate::types::constant::{
    DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_GAS_LIMIT_MULTIPLIER, DEFAULT_RECEIPT_POLL_INTERVAL_SECS,
};
use crate::types::units::{parse_gwei, parse_token};
use crate::types::{Mode, Policy};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing required field 'config_version' in config file. Current supported version: 1")]
    MissingVersion,

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field, reason: reason.into() }
    }
}

/// Versioned configuration wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "config_version")]
pub enum AgentConfigVersioned {
    #[serde(rename = "1")]
    V1(AgentConfigV1),
}

impl AgentConfigVersioned {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if yaml_value.get("config_version").is_none() {
            return Err(ConfigError::MissingVersion);
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Convert to the canonical (latest) config format
    pub fn into_canonical(self) -> AgentConfig {
        match self {
            AgentConfigVersioned::V1(v1) => v1,
        }
    }
}

/// Canonical configuration (always latest version internally)
pub type AgentConfig = AgentConfigV1;

/// A decimal written either as a YAML number or as a string.
///
/// Strings are preferred for token amounts since they are parsed without going through a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecimalValue {
    Text(String),
    Integer(u64),
    Float(f64),
}

impl DecimalValue {
    fn as_decimal_string(&self) -> String {
        match self {
            DecimalValue::Text(s) => s.trim().to_string(),
            DecimalValue::Integer(i) => i.to_string(),
            DecimalValue::Float(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Name of a built-in network, used to fill the fields below when they are absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rpc_url: Option<Url>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub explorer: Option<String>,
    /// Vesting RewardDistributor checked for unclaimed epochs after restakes.
    #[serde(default)]
    pub vesting_distributor: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Token amount, e.g. `"1.5"`.
    pub min_reward_threshold: DecimalValue,
    pub max_gas_price_gwei: DecimalValue,
    #[serde(default)]
    pub target_lock_days: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasConfig {
    #[serde(default = "default_limit_multiplier")]
    pub limit_multiplier: f64,
    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout_secs: u64,
    #[serde(default = "default_poll_interval")]
    pub receipt_poll_interval_secs: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            limit_multiplier: default_limit_multiplier(),
            confirmation_timeout_secs: default_confirmation_timeout(),
            receipt_poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_limit_multiplier() -> f64 {
    DEFAULT_GAS_LIMIT_MULTIPLIER
}

fn default_confirmation_timeout() -> u64 {
    DEFAULT_CONFIRMATION_TIMEOUT_SECS
}

fn default_poll_interval() -> u64 {
    DEFAULT_RECEIPT_POLL_INTERVAL_SECS
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Defaults to a per-mode file under `data/`.
    #[serde(default)]
    pub csv_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub webhook_url: Option<Url>,
}

/// Version 1 of the agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfigV1 {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub contract_address: Option<Address>,
    pub mode: Mode,
    pub policy: PolicyConfig,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Values given on the command line or through the environment. They win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rpc_url: Option<Url>,
    pub contract_address: Option<Address>,
    pub mode: Option<Mode>,
}

impl AgentConfigV1 {
    pub fn load(path: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = AgentConfigVersioned::from_yaml_file(path)?.into_canonical();
        config.apply_overrides(overrides);
        config.resolve_network()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(rpc_url) = &overrides.rpc_url {
            self.network.rpc_url = Some(rpc_url.clone());
        }
        if let Some(address) = overrides.contract_address {
            self.contract_address = Some(address);
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
    }

    /// Fills network fields left empty from the built-in preset named in `network.name`.
    pub fn resolve_network(&mut self) -> Result<(), ConfigError> {
        let Some(name) = self.network.name.clone() else {
            return Ok(());
        };
        let registry = NetworkRegistry::builtin();
        let Some(info) = registry.get(&name) else {
            if self.network.rpc_url.is_some() && self.network.chain_id.is_some() {
                return Ok(());
            }
            return Err(ConfigError::invalid(
                "network.name",
                format!("unknown network {name}, known: {}", registry.names().join(", ")),
            ));
        };

        if self.network.rpc_url.is_none() {
            self.network.rpc_url =
                Some(Url::parse(info.rpc_url).map_err(|e| ConfigError::invalid("network.rpc_url", e.to_string()))?);
        }
        self.network.chain_id.get_or_insert(info.chain_id);
        self.network.explorer.get_or_insert_with(|| info.explorer.to_string());
        if self.network.vesting_distributor.is_none() {
            self.network.vesting_distributor = info.vesting_distributor;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rpc_url()?;
        self.chain_id()?;
        self.contract_address()?;
        self.policy()?;

        if !self.gas.limit_multiplier.is_finite() || self.gas.limit_multiplier < 1.0 {
            return Err(ConfigError::invalid("gas.limit_multiplier", "must be a number >= 1.0"));
        }
        if self.gas.confirmation_timeout_secs == 0 {
            return Err(ConfigError::invalid("gas.confirmation_timeout_secs", "must be positive"));
        }
        if self.gas.receipt_poll_interval_secs == 0 {
            return Err(ConfigError::invalid("gas.receipt_poll_interval_secs", "must be positive"));
        }
        Ok(())
    }

    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        self.network.rpc_url.clone().ok_or_else(|| ConfigError::invalid("network.rpc_url", "not set"))
    }

    pub fn chain_id(&self) -> Result<u64, ConfigError> {
        self.network.chain_id.ok_or_else(|| ConfigError::invalid("network.chain_id", "not set"))
    }

    pub fn contract_address(&self) -> Result<Address, ConfigError> {
        match self.contract_address {
            Some(address) if address != Address::ZERO => Ok(address),
            Some(_) => Err(ConfigError::invalid("contract_address", "zero address")),
            None => Err(ConfigError::invalid("contract_address", "not set")),
        }
    }

    pub fn vesting_distributor(&self) -> Option<Address> {
        self.network.vesting_distributor.filter(|address| *address != Address::ZERO)
    }

    /// Link to a transaction on the configured explorer, if one is known.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> Option<String> {
        let base = self.network.explorer.as_deref()?;
        Some(format!("{}/tx/{tx_hash}", base.trim_end_matches('/')))
    }

    /// Builds the policy handed to the gate. Amounts are converted to wei here, once.
    pub fn policy(&self) -> Result<Policy, ConfigError> {
        let threshold = self.policy.min_reward_threshold.as_decimal_string();
        if threshold.starts_with('-') {
            return Err(ConfigError::invalid("policy.min_reward_threshold", "must not be negative"));
        }
        let min_reward_threshold = parse_token(&threshold)
            .map_err(|e| ConfigError::invalid("policy.min_reward_threshold", format!("{threshold}: {e}")))?;

        let gas_cap = self.policy.max_gas_price_gwei.as_decimal_string();
        if gas_cap.starts_with('-') {
            return Err(ConfigError::invalid("policy.max_gas_price_gwei", "must not be negative"));
        }
        let max_gas_price = parse_gwei(&gas_cap)
            .map_err(|e| ConfigError::invalid("policy.max_gas_price_gwei", format!("{gas_cap}: {e}")))?;

        if self.policy.target_lock_days == Some(0) {
            return Err(ConfigError::invalid("policy.target_lock_days", "must be positive"));
        }

        Ok(Policy {
            mode: self.mode,
            min_reward_threshold,
            max_gas_price,
            target_lock_days: self.policy.target_lock_days,
        })
    }

    pub fn history_file(&self) -> PathBuf {
        self.history.csv_file.clone().unwrap_or_else(|| PathBuf::from(self.mode.default_history_file()))
    }

    pub fn gas_settings(&self) -> GasSettings {
        GasSettings {
            limit_multiplier: self.gas.limit_multiplier,
            confirmation_timeout: Duration::from_secs(self.gas.confirmation_timeout_secs),
            receipt_poll_interval: Duration::from_secs(self.gas.receipt_poll_interval_secs),
        }
    }
}

impl FromStr for AgentConfigV1 {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentConfigVersioned::from_yaml_str(s).map(AgentConfigVersioned::into_canonical)
    }
}
