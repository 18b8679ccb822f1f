#![warn(clippy::missing_docs_in_private_items)]

use std::collections::HashMap;

use raiden_macros::IntoStateChange;
use raiden_primitives::{
	deserializers::u256_from_str,
	serializers::u256_to_str,
	types::{
		Address,
		BlockExpiration,
		BlockNumber,
		ChannelIdentifier,
		EncodedLock,
		SecretHash,
		SettleTimeout,
		Signature,
		TokenAmount,
	},
};
use serde::{
	Deserialize,
	Serialize,
};

use crate::types::{
	BalanceProofState,
	SettlementData,
};

/// An enum containing all possible state change variants.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(tag = "type")]
pub enum StateChange {
	Block(Block),
	ActionChannelOpen(ActionChannelOpen),
	ActionChannelSetTotalDeposit(ActionChannelSetTotalDeposit),
	ActionChannelSetTotalWithdraw(ActionChannelSetTotalWithdraw),
	ActionChannelClose(ActionChannelClose),
	ActionChannelUpdateNonClosingBalanceProof(ActionChannelUpdateNonClosingBalanceProof),
	ActionChannelSettle(ActionChannelSettle),
	ActionChannelUnlock(ActionChannelUnlock),
	ActionDeprecationSwitch(ActionDeprecationSwitch),
}

impl StateChange {
	/// Returns a string of the inner state change's type name.
	pub fn type_name(&self) -> &'static str {
		match self {
			StateChange::Block(_) => "Block",
			StateChange::ActionChannelOpen(_) => "ActionChannelOpen",
			StateChange::ActionChannelSetTotalDeposit(_) => "ActionChannelSetTotalDeposit",
			StateChange::ActionChannelSetTotalWithdraw(_) => "ActionChannelSetTotalWithdraw",
			StateChange::ActionChannelClose(_) => "ActionChannelClose",
			StateChange::ActionChannelUpdateNonClosingBalanceProof(_) =>
				"ActionChannelUpdateNonClosingBalanceProof",
			StateChange::ActionChannelSettle(_) => "ActionChannelSettle",
			StateChange::ActionChannelUnlock(_) => "ActionChannelUnlock",
			StateChange::ActionDeprecationSwitch(_) => "ActionDeprecationSwitch",
		}
	}
}

/// A new block was observed.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct Block {
	pub block_number: BlockNumber,
}

/// Open a channel between two participants.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct ActionChannelOpen {
	pub participant1: Address,
	pub participant2: Address,
	pub settle_timeout: SettleTimeout,
}

/// Raise a participant's total deposit.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct ActionChannelSetTotalDeposit {
	pub channel_identifier: ChannelIdentifier,
	pub participant: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub total_deposit: TokenAmount,
	pub partner: Address,
}

/// Raise a participant's total withdraw, confirmed by both participants.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct ActionChannelSetTotalWithdraw {
	pub channel_identifier: ChannelIdentifier,
	pub participant: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub total_withdraw: TokenAmount,
	pub expiration_block: BlockExpiration,
	pub partner: Address,
	pub participant_signature: Signature,
	pub partner_signature: Signature,
}

/// Close a channel with the balance proof the closer received from its partner.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct ActionChannelClose {
	pub channel_identifier: ChannelIdentifier,
	pub closing_participant: Address,
	pub non_closing_participant: Address,
	pub balance_proof: BalanceProofState,
	pub closing_signature: Signature,
}

/// Register the closer's newest balance proof on behalf of the non closing participant.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct ActionChannelUpdateNonClosingBalanceProof {
	pub channel_identifier: ChannelIdentifier,
	pub closing_participant: Address,
	pub non_closing_participant: Address,
	pub balance_proof: BalanceProofState,
	pub non_closing_signature: Signature,
}

/// Settle a closed channel with both participants' final balance data.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct ActionChannelSettle {
	pub channel_identifier: ChannelIdentifier,
	pub participant1: SettlementData,
	pub participant2: SettlementData,
}

/// Resolve the locks `sender` left pending towards `receiver`.
///
/// `secret_reveals` holds the reveal block of every secrethash in `locks`,
/// read from the secret registry before the transition runs.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct ActionChannelUnlock {
	pub channel_identifier: ChannelIdentifier,
	pub receiver: Address,
	pub sender: Address,
	pub locks: EncodedLock,
	pub secret_reveals: HashMap<SecretHash, BlockNumber>,
}

/// Turn on the deprecation switch.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, IntoStateChange)]
pub struct ActionDeprecationSwitch {
	pub caller: Address,
}
