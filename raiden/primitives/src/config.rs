use std::{
	fs::File,
	path::Path,
};

use serde::{
	Deserialize,
	Serialize,
};
use thiserror::Error;

use crate::{
	constants::{
		DEFAULT_SETTLEMENT_TIMEOUT_MAX,
		DEFAULT_SETTLEMENT_TIMEOUT_MIN,
	},
	deserializers::u256_from_str,
	serializers::u256_to_str,
	types::{
		Address,
		ChainID,
		SettleTimeout,
		TokenAddress,
		TokenAmount,
		TokenNetworkAddress,
	},
};

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Could not open configuration file: `{0}`")]
	Io(#[from] std::io::Error),
	#[error("Could not parse configuration: `{0}`")]
	Parse(#[from] serde_json::Error),
	#[error("Invalid configuration: `{0}`")]
	Invalid(String),
}

fn default_settlement_timeout_min() -> SettleTimeout {
	SettleTimeout::from(DEFAULT_SETTLEMENT_TIMEOUT_MIN)
}

fn default_settlement_timeout_max() -> SettleTimeout {
	SettleTimeout::from(DEFAULT_SETTLEMENT_TIMEOUT_MAX)
}

/// Immutable parameters of a token network.
///
/// Deposit limits set to zero are disabled.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TokenNetworkConfig {
	pub chain_id: ChainID,
	pub token_network_address: TokenNetworkAddress,
	pub token_address: TokenAddress,
	#[serde(default = "default_settlement_timeout_min")]
	pub settlement_timeout_min: SettleTimeout,
	#[serde(default = "default_settlement_timeout_max")]
	pub settlement_timeout_max: SettleTimeout,
	#[serde(default, deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub channel_participant_deposit_limit: TokenAmount,
	#[serde(default, deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub token_network_deposit_limit: TokenAmount,
	pub deprecation_executor: Address,
}

impl TokenNetworkConfig {
	/// Configuration with default timeouts and no deposit limits.
	pub fn new(
		chain_id: ChainID,
		token_network_address: TokenNetworkAddress,
		token_address: TokenAddress,
		deprecation_executor: Address,
	) -> Self {
		Self {
			chain_id,
			token_network_address,
			token_address,
			settlement_timeout_min: default_settlement_timeout_min(),
			settlement_timeout_max: default_settlement_timeout_max(),
			channel_participant_deposit_limit: TokenAmount::zero(),
			token_network_deposit_limit: TokenAmount::zero(),
			deprecation_executor,
		}
	}

	/// Load and validate a JSON configuration file.
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let file = File::open(path)?;
		let config: TokenNetworkConfig = serde_json::from_reader(file)?;
		config.validate()?;
		Ok(config)
	}

	/// Check the configuration is internally consistent.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.settlement_timeout_min.is_zero() {
			return Err(ConfigError::Invalid("settlement_timeout_min must be positive".to_owned()))
		}
		if self.settlement_timeout_min > self.settlement_timeout_max {
			return Err(ConfigError::Invalid(format!(
				"settlement_timeout_min ({}) is larger than settlement_timeout_max ({})",
				self.settlement_timeout_min, self.settlement_timeout_max
			)))
		}
		if self.token_network_address.is_zero() || self.token_address.is_zero() {
			return Err(ConfigError::Invalid(
				"Token network and token addresses must be set".to_owned(),
			))
		}
		if !self.channel_participant_deposit_limit.is_zero() &&
			!self.token_network_deposit_limit.is_zero() &&
			self.channel_participant_deposit_limit > self.token_network_deposit_limit
		{
			return Err(ConfigError::Invalid(
				"Participant deposit limit exceeds the token network deposit limit".to_owned(),
			))
		}
		Ok(())
	}
}
