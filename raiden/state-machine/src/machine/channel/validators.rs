use raiden_primitives::{
	config::TokenNetworkConfig,
	constants::EMPTY_BALANCE_HASH,
	hashing::{
		hash_balance_data,
		is_empty_balance_data,
	},
	packing::SignedMessage,
	types::{
		Address,
		BlockNumber,
		SettleTimeout,
	},
};

use crate::{
	errors::StateTransitionError,
	types::{
		ChannelState,
		ChannelStatus,
		ParticipantState,
		SettlementData,
	},
};

/// Two distinct, non zero participants.
pub(crate) fn validate_participants(
	participant1: Address,
	participant2: Address,
) -> Result<(), StateTransitionError> {
	if participant1.is_zero() || participant2.is_zero() {
		return Err(StateTransitionError::ZeroAddress)
	}
	if participant1 == participant2 {
		return Err(StateTransitionError::SameParticipants(participant1))
	}
	Ok(())
}

pub(crate) fn validate_settle_timeout(
	config: &TokenNetworkConfig,
	settle_timeout: SettleTimeout,
) -> Result<(), StateTransitionError> {
	if settle_timeout < config.settlement_timeout_min ||
		settle_timeout > config.settlement_timeout_max
	{
		return Err(StateTransitionError::SettleTimeoutOutOfRange {
			timeout: settle_timeout,
			min: config.settlement_timeout_min,
			max: config.settlement_timeout_max,
		})
	}
	Ok(())
}

pub(crate) fn validate_status(
	channel_state: &ChannelState,
	expected: ChannelStatus,
) -> Result<(), StateTransitionError> {
	if channel_state.status != expected {
		return Err(StateTransitionError::InvalidChannelStatus {
			channel_identifier: channel_state.channel_identifier(),
			status: channel_state.status,
			expected,
		})
	}
	Ok(())
}

pub(crate) fn validate_channel_participants(
	channel_state: &ChannelState,
	participant: Address,
	partner: Address,
) -> Result<(), StateTransitionError> {
	if participant == partner {
		return Err(StateTransitionError::SameParticipants(participant))
	}
	for address in [participant, partner] {
		if channel_state.participant(address).is_none() {
			return Err(StateTransitionError::NotParticipant(address))
		}
	}
	Ok(())
}

/// The signature over `message` must come from `expected`.
pub(crate) fn validate_signer(
	message: &SignedMessage,
	signature: &[u8],
	expected: Address,
) -> Result<(), StateTransitionError> {
	let recovered = message.recover_signer(signature)?;
	if recovered != expected {
		return Err(StateTransitionError::InvalidSigner { expected, recovered })
	}
	Ok(())
}

/// Balance data revealed at settlement must match the recorded balance hash.
///
/// A participant without a recorded balance proof must reveal empty balance data.
pub(crate) fn validate_settlement_data(
	participant: &ParticipantState,
	settlement_data: &SettlementData,
) -> Result<(), StateTransitionError> {
	let matches = if participant.balance_hash == *EMPTY_BALANCE_HASH {
		is_empty_balance_data(
			settlement_data.transferred_amount,
			settlement_data.locked_amount,
			settlement_data.locksroot,
		)
	} else {
		participant.balance_hash ==
			hash_balance_data(
				settlement_data.transferred_amount,
				settlement_data.locked_amount,
				settlement_data.locksroot,
			)
	};

	if !matches {
		return Err(StateTransitionError::BalanceHashMismatch(participant.address))
	}
	Ok(())
}

pub(crate) fn validate_settlement_window_elapsed(
	channel_state: &ChannelState,
	block_number: BlockNumber,
) -> Result<(), StateTransitionError> {
	if block_number < channel_state.settle_block_number {
		return Err(StateTransitionError::SettlementWindowNotElapsed {
			settle_block_number: channel_state.settle_block_number,
			current_block: block_number,
		})
	}
	Ok(())
}

pub(crate) fn validate_settlement_window_open(
	channel_state: &ChannelState,
	block_number: BlockNumber,
) -> Result<(), StateTransitionError> {
	if block_number > channel_state.settle_block_number {
		return Err(StateTransitionError::SettlementWindowExpired {
			settle_block_number: channel_state.settle_block_number,
			current_block: block_number,
		})
	}
	Ok(())
}
