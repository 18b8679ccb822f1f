#![warn(clippy::missing_docs_in_private_items)]

use raiden_primitives::{
	constants::LOCKSROOT_OF_NO_LOCKS,
	types::{
		Address,
		BalanceHash,
		BlockNumber,
		ChannelIdentifier,
		LockedAmount,
		Locksroot,
		Nonce,
		TokenAmount,
	},
};
use serde::{
	Deserialize,
	Serialize,
};

use crate::types::{
	ChannelState,
	ChannelStatus,
	TokenNetworkState,
};

/// Information about one side of a channel.
#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct ParticipantInfo {
	pub deposit: TokenAmount,
	pub withdrawn: TokenAmount,
	pub is_closer: bool,
	pub balance_hash: BalanceHash,
	pub nonce: Nonce,
	pub locksroot: Locksroot,
	pub locked_amount: LockedAmount,
}

/// Returns the open or closed channel between the pair, zero if there is none.
pub fn get_channel_identifier(
	token_network_state: &TokenNetworkState,
	participant: Address,
	partner: Address,
) -> ChannelIdentifier {
	token_network_state.channel_identifier_of(participant, partner).unwrap_or_default()
}

/// Returns the channel `channel_identifier` if it is still open or closed between the pair.
pub fn get_channel<'a>(
	token_network_state: &'a TokenNetworkState,
	channel_identifier: ChannelIdentifier,
	participant: Address,
	partner: Address,
) -> Option<&'a ChannelState> {
	token_network_state
		.channel(channel_identifier)
		.filter(|channel_state| channel_state.has_participants(participant, partner))
}

/// Returns `(locksroot, locked_amount)` left by `locker` towards `receiver` at settlement.
pub fn get_unlock_info(
	token_network_state: &TokenNetworkState,
	channel_identifier: ChannelIdentifier,
	locker: Address,
	receiver: Address,
) -> (Locksroot, LockedAmount) {
	token_network_state
		.unlock(channel_identifier, locker, receiver)
		.map(|unlock| (unlock.locksroot, unlock.locked_amount))
		.unwrap_or((*LOCKSROOT_OF_NO_LOCKS, LockedAmount::zero()))
}

/// Returns `(settle_block_number, status)` of a channel.
///
/// Once settled, a channel stays `Settled` until both of its unlock records
/// are cleared, after which it is `Removed`.
pub fn get_channel_info(
	token_network_state: &TokenNetworkState,
	channel_identifier: ChannelIdentifier,
	participant1: Address,
	participant2: Address,
) -> (BlockNumber, ChannelStatus) {
	if let Some(channel_state) =
		get_channel(token_network_state, channel_identifier, participant1, participant2)
	{
		return (channel_state.settle_block_number, channel_state.status)
	}

	let (_, locked1) =
		get_unlock_info(token_network_state, channel_identifier, participant1, participant2);
	let (_, locked2) =
		get_unlock_info(token_network_state, channel_identifier, participant2, participant1);
	if !locked1.is_zero() || !locked2.is_zero() {
		return (BlockNumber::zero(), ChannelStatus::Settled)
	}

	let was_assigned = !channel_identifier.is_zero() &&
		channel_identifier <= token_network_state.channel_counter &&
		!token_network_state.channelidentifiers_to_channels.contains_key(&channel_identifier);
	if was_assigned {
		return (BlockNumber::zero(), ChannelStatus::Removed)
	}

	(BlockNumber::zero(), ChannelStatus::NonExistent)
}

/// Returns the on-chain record of `participant` in the channel with `partner`.
pub fn get_channel_participant_info(
	token_network_state: &TokenNetworkState,
	channel_identifier: ChannelIdentifier,
	participant: Address,
	partner: Address,
) -> ParticipantInfo {
	let (locksroot, locked_amount) =
		get_unlock_info(token_network_state, channel_identifier, participant, partner);

	match get_channel(token_network_state, channel_identifier, participant, partner)
		.and_then(|channel_state| channel_state.participant(participant))
	{
		Some(participant_state) => ParticipantInfo {
			deposit: participant_state.deposit,
			withdrawn: participant_state.withdrawn,
			is_closer: participant_state.is_closer,
			balance_hash: participant_state.balance_hash,
			nonce: participant_state.nonce,
			locksroot,
			locked_amount,
		},
		None => ParticipantInfo { locksroot, locked_amount, ..Default::default() },
	}
}
