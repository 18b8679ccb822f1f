use std::collections::HashMap;

use derive_more::Display;
use raiden_primitives::{
	config::TokenNetworkConfig,
	constants::EMPTY_BALANCE_HASH,
	deserializers::u256_from_str,
	hashing::{
		participants_hash,
		unlock_identifier,
	},
	serializers::u256_to_str,
	types::{
		AdditionalHash,
		Address,
		BalanceHash,
		BlockNumber,
		CanonicalIdentifier,
		ChannelIdentifier,
		LockedAmount,
		Locksroot,
		Nonce,
		ParticipantsHash,
		SettleTimeout,
		Signature,
		TokenAmount,
		UnlockIdentifier,
		U256,
	},
};
use serde::{
	Deserialize,
	Serialize,
};

/// Lifecycle of a channel as seen through the token network views.
#[derive(Copy, Clone, Display, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ChannelStatus {
	#[display(fmt = "non_existent")]
	NonExistent,
	#[display(fmt = "opened")]
	Opened,
	#[display(fmt = "closed")]
	Closed,
	#[display(fmt = "settled")]
	Settled,
	#[display(fmt = "removed")]
	Removed,
}

/// A balance proof as submitted on-chain: the commitment and its signature.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct BalanceProofState {
	pub balance_hash: BalanceHash,
	pub nonce: Nonce,
	pub additional_hash: AdditionalHash,
	pub signature: Signature,
}

/// Balance data a participant reveals at settlement.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
pub struct SettlementData {
	pub address: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub transferred_amount: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub locked_amount: LockedAmount,
	pub locksroot: Locksroot,
}

/// On-chain record of one side of a channel.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ParticipantState {
	pub address: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub deposit: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub withdrawn: TokenAmount,
	pub is_closer: bool,
	pub balance_hash: BalanceHash,
	pub nonce: Nonce,
}

impl ParticipantState {
	pub fn new(address: Address) -> Self {
		Self {
			address,
			deposit: TokenAmount::zero(),
			withdrawn: TokenAmount::zero(),
			is_closer: false,
			balance_hash: *EMPTY_BALANCE_HASH,
			nonce: Nonce::zero(),
		}
	}
}

/// A channel between two participants, stored in address order.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ChannelState {
	pub canonical_identifier: CanonicalIdentifier,
	pub settle_timeout: SettleTimeout,
	pub settle_block_number: BlockNumber,
	pub status: ChannelStatus,
	pub participant1: ParticipantState,
	pub participant2: ParticipantState,
	pub update_submitted: bool,
}

impl ChannelState {
	pub fn channel_identifier(&self) -> ChannelIdentifier {
		self.canonical_identifier.channel_identifier
	}

	pub fn participant(&self, address: Address) -> Option<&ParticipantState> {
		if self.participant1.address == address {
			Some(&self.participant1)
		} else if self.participant2.address == address {
			Some(&self.participant2)
		} else {
			None
		}
	}

	/// Returns the participant state of `address` and its partner.
	pub fn participants_mut(
		&mut self,
		address: Address,
	) -> Option<(&mut ParticipantState, &mut ParticipantState)> {
		if self.participant1.address == address {
			Some((&mut self.participant1, &mut self.participant2))
		} else if self.participant2.address == address {
			Some((&mut self.participant2, &mut self.participant1))
		} else {
			None
		}
	}

	pub fn has_participants(&self, participant: Address, partner: Address) -> bool {
		participant != partner &&
			self.participant(participant).is_some() &&
			self.participant(partner).is_some()
	}

	pub fn total_deposit(&self) -> Option<TokenAmount> {
		self.participant1.deposit.checked_add(self.participant2.deposit)
	}

	pub fn total_withdrawn(&self) -> Option<TokenAmount> {
		self.participant1.withdrawn.checked_add(self.participant2.withdrawn)
	}
}

/// Tokens left locked by `locker` towards `receiver` after settlement.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct UnlockState {
	pub channel_identifier: ChannelIdentifier,
	pub locker: Address,
	pub receiver: Address,
	pub locksroot: Locksroot,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub locked_amount: LockedAmount,
}

impl UnlockState {
	pub fn identifier(&self) -> UnlockIdentifier {
		unlock_identifier(self.channel_identifier, self.locker, self.receiver)
	}
}

/// The explicit store of a token network, passed into every transition.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct TokenNetworkState {
	pub config: TokenNetworkConfig,
	pub block_number: BlockNumber,
	pub channel_counter: ChannelIdentifier,
	pub safety_deprecation_switch: bool,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub network_balance: TokenAmount,
	pub channelidentifiers_to_channels: HashMap<ChannelIdentifier, ChannelState>,
	pub participants_to_channelidentifiers: HashMap<ParticipantsHash, ChannelIdentifier>,
	pub unlocks: HashMap<UnlockIdentifier, UnlockState>,
}

impl TokenNetworkState {
	pub fn new(config: TokenNetworkConfig, block_number: BlockNumber) -> Self {
		Self {
			config,
			block_number,
			channel_counter: U256::zero(),
			safety_deprecation_switch: false,
			network_balance: TokenAmount::zero(),
			channelidentifiers_to_channels: HashMap::new(),
			participants_to_channelidentifiers: HashMap::new(),
			unlocks: HashMap::new(),
		}
	}

	pub fn canonical_identifier(
		&self,
		channel_identifier: ChannelIdentifier,
	) -> CanonicalIdentifier {
		CanonicalIdentifier {
			chain_identifier: self.config.chain_id,
			token_network_address: self.config.token_network_address,
			channel_identifier,
		}
	}

	pub fn channel_identifier_of(
		&self,
		participant: Address,
		partner: Address,
	) -> Option<ChannelIdentifier> {
		self.participants_to_channelidentifiers
			.get(&participants_hash(participant, partner))
			.copied()
	}

	pub fn channel(&self, channel_identifier: ChannelIdentifier) -> Option<&ChannelState> {
		self.channelidentifiers_to_channels.get(&channel_identifier)
	}

	pub fn unlock(
		&self,
		channel_identifier: ChannelIdentifier,
		locker: Address,
		receiver: Address,
	) -> Option<&UnlockState> {
		self.unlocks.get(&unlock_identifier(channel_identifier, locker, receiver))
	}
}

/// A movement of tokens a transition requires, executed by the token ledger.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
pub struct TokenTransfer {
	pub from: Address,
	pub to: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub amount: TokenAmount,
}
