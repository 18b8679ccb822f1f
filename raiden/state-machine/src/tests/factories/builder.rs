use raiden_primitives::{
	config::TokenNetworkConfig,
	types::{
		Address,
		BlockNumber,
		CanonicalIdentifier,
		ChainID,
		ChannelIdentifier,
		SettleTimeout,
		TokenAmount,
	},
};

use super::Keyring;
use crate::{
	machine::token_network::{
		self,
		TokenNetworkTransition,
	},
	types::{
		ActionChannelOpen,
		ActionChannelSetTotalDeposit,
		Block,
		StateChange,
		TokenNetworkState,
	},
};

pub const SETTLE_TIMEOUT: u64 = 500;

pub fn token_network_config() -> TokenNetworkConfig {
	TokenNetworkConfig::new(
		ChainID::Goerli,
		Address::from_low_u64_be(0x1000),
		Address::from_low_u64_be(0x2000),
		Keyring::Charlie.address(),
	)
}

/// Apply a state change which is expected to succeed.
pub fn apply(
	state: TokenNetworkState,
	state_change: impl Into<StateChange>,
) -> TokenNetworkTransition {
	token_network::state_transition(state, state_change.into())
		.expect("State transition should succeed")
}

pub fn at_block(state: TokenNetworkState, block_number: u64) -> TokenNetworkState {
	apply(state, Block { block_number: BlockNumber::from(block_number) }).new_state
}

pub struct TokenNetworkInfo {
	pub state: TokenNetworkState,
	pub canonical_identifier: CanonicalIdentifier,
}

impl TokenNetworkInfo {
	pub fn channel_identifier(&self) -> ChannelIdentifier {
		self.canonical_identifier.channel_identifier
	}
}

pub struct TokenNetworkBuilder {
	state: TokenNetworkState,
	channel_identifier: ChannelIdentifier,
}

impl TokenNetworkBuilder {
	pub fn new() -> Self {
		Self::with_config(token_network_config())
	}

	pub fn with_config(config: TokenNetworkConfig) -> Self {
		Self {
			state: TokenNetworkState::new(config, BlockNumber::from(1u64)),
			channel_identifier: ChannelIdentifier::zero(),
		}
	}

	pub fn with_block(mut self, block_number: u64) -> Self {
		self.state = at_block(self.state, block_number);
		self
	}

	pub fn with_channel(mut self, participant1: Keyring, participant2: Keyring) -> Self {
		let state_change = ActionChannelOpen {
			participant1: participant1.address(),
			participant2: participant2.address(),
			settle_timeout: SettleTimeout::from(SETTLE_TIMEOUT),
		};
		self.state = apply(self.state, state_change).new_state;
		self.channel_identifier = self.state.channel_counter;
		self
	}

	pub fn with_deposit(
		mut self,
		participant: Keyring,
		partner: Keyring,
		total_deposit: u64,
	) -> Self {
		let state_change = ActionChannelSetTotalDeposit {
			channel_identifier: self.channel_identifier,
			participant: participant.address(),
			total_deposit: TokenAmount::from(total_deposit),
			partner: partner.address(),
		};
		self.state = apply(self.state, state_change).new_state;
		self
	}

	pub fn build(self) -> TokenNetworkInfo {
		let canonical_identifier = self.state.canonical_identifier(self.channel_identifier);
		TokenNetworkInfo { state: self.state, canonical_identifier }
	}
}
