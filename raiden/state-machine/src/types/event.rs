use raiden_macros::IntoEvent;
use raiden_primitives::{
	deserializers::u256_from_str,
	serializers::u256_to_str,
	types::{
		Address,
		BalanceHash,
		ChannelIdentifier,
		Locksroot,
		Nonce,
		SettleTimeout,
		TokenAmount,
	},
};
use serde::{
	Deserialize,
	Serialize,
};

/// Events emitted by the token network, one per applied action.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
	ChannelOpened(ChannelOpened),
	ChannelNewDeposit(ChannelNewDeposit),
	ChannelWithdraw(ChannelWithdraw),
	ChannelClosed(ChannelClosed),
	NonClosingBalanceProofUpdated(NonClosingBalanceProofUpdated),
	ChannelSettled(ChannelSettled),
	ChannelUnlocked(ChannelUnlocked),
	DeprecationSwitch(DeprecationSwitch),
}

impl Event {
	/// Returns a string of the inner event's type name.
	pub fn type_name(&self) -> &'static str {
		match self {
			Event::ChannelOpened(_) => "ChannelOpened",
			Event::ChannelNewDeposit(_) => "ChannelNewDeposit",
			Event::ChannelWithdraw(_) => "ChannelWithdraw",
			Event::ChannelClosed(_) => "ChannelClosed",
			Event::NonClosingBalanceProofUpdated(_) => "NonClosingBalanceProofUpdated",
			Event::ChannelSettled(_) => "ChannelSettled",
			Event::ChannelUnlocked(_) => "ChannelUnlocked",
			Event::DeprecationSwitch(_) => "DeprecationSwitch",
		}
	}
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoEvent)]
pub struct ChannelOpened {
	pub channel_identifier: ChannelIdentifier,
	pub participant1: Address,
	pub participant2: Address,
	pub settle_timeout: SettleTimeout,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoEvent)]
pub struct ChannelNewDeposit {
	pub channel_identifier: ChannelIdentifier,
	pub participant: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub total_deposit: TokenAmount,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoEvent)]
pub struct ChannelWithdraw {
	pub channel_identifier: ChannelIdentifier,
	pub participant: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub total_withdraw: TokenAmount,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoEvent)]
pub struct ChannelClosed {
	pub channel_identifier: ChannelIdentifier,
	pub closing_participant: Address,
	pub nonce: Nonce,
	pub balance_hash: BalanceHash,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoEvent)]
pub struct NonClosingBalanceProofUpdated {
	pub channel_identifier: ChannelIdentifier,
	pub closing_participant: Address,
	pub nonce: Nonce,
	pub balance_hash: BalanceHash,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoEvent)]
pub struct ChannelSettled {
	pub channel_identifier: ChannelIdentifier,
	pub participant1: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub participant1_amount: TokenAmount,
	pub participant1_locksroot: Locksroot,
	pub participant2: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub participant2_amount: TokenAmount,
	pub participant2_locksroot: Locksroot,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoEvent)]
pub struct ChannelUnlocked {
	pub channel_identifier: ChannelIdentifier,
	pub receiver: Address,
	pub sender: Address,
	pub locksroot: Locksroot,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub unlocked_amount: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub returned_tokens: TokenAmount,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoEvent)]
pub struct DeprecationSwitch {
	pub new_value: bool,
}
