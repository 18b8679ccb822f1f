#![warn(clippy::missing_docs_in_private_items)]

use raiden_primitives::{
	config::TokenNetworkConfig,
	types::{
		BlockNumber,
		TokenAmount,
	},
};

use super::settlement;
use crate::{
	errors::StateTransitionError,
	types::{
		ActionChannelClose,
		ActionChannelSetTotalDeposit,
		ActionChannelSetTotalWithdraw,
		ActionChannelSettle,
		ActionChannelUpdateNonClosingBalanceProof,
		ChannelClosed,
		ChannelNewDeposit,
		ChannelSettled,
		ChannelState,
		ChannelStatus,
		ChannelWithdraw,
		Event,
		NonClosingBalanceProofUpdated,
		StateChange,
		TokenTransfer,
		UnlockState,
	},
};

pub mod utils;
pub mod validators;

use utils::{
	balance_proof_message,
	balance_proof_update_message,
	settlement_balance,
	withdraw_message,
};
use validators::{
	validate_channel_participants,
	validate_settlement_data,
	validate_settlement_window_elapsed,
	validate_settlement_window_open,
	validate_signer,
	validate_status,
};

/// A transition result for the channel state.
///
/// `new_state` is `None` once the channel is settled and must be removed.
#[derive(Debug)]
pub struct ChannelTransition {
	pub new_state: Option<ChannelState>,
	pub events: Vec<Event>,
	pub transfers: Vec<TokenTransfer>,
	pub unlocks: Vec<UnlockState>,
}

impl ChannelTransition {
	fn new(new_state: Option<ChannelState>, event: Event) -> Self {
		Self { new_state, events: vec![event], transfers: vec![], unlocks: vec![] }
	}
}

/// Type alias for a result of a channel transition.
type TransitionResult = std::result::Result<ChannelTransition, StateTransitionError>;

fn handle_action_set_total_deposit(
	mut channel_state: ChannelState,
	state_change: ActionChannelSetTotalDeposit,
	config: &TokenNetworkConfig,
) -> TransitionResult {
	validate_status(&channel_state, ChannelStatus::Opened)?;
	validate_channel_participants(&channel_state, state_change.participant, state_change.partner)?;

	let limit = config.channel_participant_deposit_limit;
	let channel_identifier = channel_state.channel_identifier();
	let (participant, partner) = channel_state
		.participants_mut(state_change.participant)
		.ok_or(StateTransitionError::NotParticipant(state_change.participant))?;

	if state_change.total_deposit <= participant.deposit {
		return Err(StateTransitionError::DepositNotIncreasing {
			total_deposit: state_change.total_deposit,
			current: participant.deposit,
		})
	}
	if !limit.is_zero() && state_change.total_deposit > limit {
		return Err(StateTransitionError::ParticipantDepositLimitExceeded {
			total_deposit: state_change.total_deposit,
			limit,
		})
	}
	if state_change.total_deposit.checked_add(partner.deposit).is_none() {
		return Err(StateTransitionError::DepositOverflow {
			total_deposit: state_change.total_deposit,
			partner_deposit: partner.deposit,
		})
	}

	let added = state_change.total_deposit - participant.deposit;
	participant.deposit = state_change.total_deposit;

	let mut transition = ChannelTransition::new(
		Some(channel_state),
		ChannelNewDeposit {
			channel_identifier,
			participant: state_change.participant,
			total_deposit: state_change.total_deposit,
		}
		.into(),
	);
	transition.transfers.push(TokenTransfer {
		from: state_change.participant,
		to: config.token_network_address,
		amount: added,
	});
	Ok(transition)
}

fn handle_action_set_total_withdraw(
	mut channel_state: ChannelState,
	state_change: ActionChannelSetTotalWithdraw,
	config: &TokenNetworkConfig,
	block_number: BlockNumber,
) -> TransitionResult {
	validate_status(&channel_state, ChannelStatus::Opened)?;
	validate_channel_participants(&channel_state, state_change.participant, state_change.partner)?;

	if block_number >= state_change.expiration_block {
		return Err(StateTransitionError::WithdrawExpired {
			expiration_block: state_change.expiration_block,
			current_block: block_number,
		})
	}

	let canonical_identifier = channel_state.canonical_identifier;
	let total_deposit = channel_state.total_deposit();
	let (participant, partner) = channel_state
		.participants_mut(state_change.participant)
		.ok_or(StateTransitionError::NotParticipant(state_change.participant))?;

	if state_change.total_withdraw <= participant.withdrawn {
		return Err(StateTransitionError::WithdrawNotIncreasing {
			total_withdraw: state_change.total_withdraw,
			current: participant.withdrawn,
		})
	}

	let message = withdraw_message(
		canonical_identifier,
		state_change.participant,
		state_change.total_withdraw,
		state_change.expiration_block,
	);
	validate_signer(&message, &state_change.participant_signature.0, state_change.participant)?;
	validate_signer(&message, &state_change.partner_signature.0, state_change.partner)?;

	let total_withdrawn = state_change.total_withdraw.checked_add(partner.withdrawn);
	match (total_withdrawn, total_deposit) {
		(Some(total_withdrawn), Some(total_deposit)) if total_withdrawn <= total_deposit => {},
		_ => return Err(StateTransitionError::WithdrawExceedsDeposit),
	}

	let amount = state_change.total_withdraw - participant.withdrawn;
	participant.withdrawn = state_change.total_withdraw;

	let mut transition = ChannelTransition::new(
		Some(channel_state),
		ChannelWithdraw {
			channel_identifier: canonical_identifier.channel_identifier,
			participant: state_change.participant,
			total_withdraw: state_change.total_withdraw,
		}
		.into(),
	);
	transition.transfers.push(TokenTransfer {
		from: config.token_network_address,
		to: state_change.participant,
		amount,
	});
	Ok(transition)
}

fn handle_action_close(
	mut channel_state: ChannelState,
	state_change: ActionChannelClose,
	block_number: BlockNumber,
) -> TransitionResult {
	validate_status(&channel_state, ChannelStatus::Opened)?;
	validate_channel_participants(
		&channel_state,
		state_change.closing_participant,
		state_change.non_closing_participant,
	)?;

	let canonical_identifier = channel_state.canonical_identifier;
	let balance_proof = &state_change.balance_proof;
	validate_signer(
		&balance_proof_update_message(canonical_identifier, balance_proof),
		&state_change.closing_signature.0,
		state_change.closing_participant,
	)?;

	// A zero nonce closes without the partner's balance proof.
	let has_balance_proof = !balance_proof.nonce.is_zero();
	if has_balance_proof {
		validate_signer(
			&balance_proof_message(canonical_identifier, balance_proof),
			&balance_proof.signature.0,
			state_change.non_closing_participant,
		)?;
	}

	let settle_block_number = block_number.saturating_add(channel_state.settle_timeout);
	let (closing, non_closing) = channel_state
		.participants_mut(state_change.closing_participant)
		.ok_or(StateTransitionError::NotParticipant(state_change.closing_participant))?;
	closing.is_closer = true;
	if has_balance_proof {
		non_closing.balance_hash = balance_proof.balance_hash;
		non_closing.nonce = balance_proof.nonce;
	}
	let recorded_nonce = non_closing.nonce;
	let recorded_balance_hash = non_closing.balance_hash;

	channel_state.status = ChannelStatus::Closed;
	channel_state.settle_block_number = settle_block_number;

	Ok(ChannelTransition::new(
		Some(channel_state),
		ChannelClosed {
			channel_identifier: canonical_identifier.channel_identifier,
			closing_participant: state_change.closing_participant,
			nonce: recorded_nonce,
			balance_hash: recorded_balance_hash,
		}
		.into(),
	))
}

fn handle_action_update_non_closing_balance_proof(
	mut channel_state: ChannelState,
	state_change: ActionChannelUpdateNonClosingBalanceProof,
	block_number: BlockNumber,
) -> TransitionResult {
	validate_status(&channel_state, ChannelStatus::Closed)?;
	validate_settlement_window_open(&channel_state, block_number)?;
	validate_channel_participants(
		&channel_state,
		state_change.closing_participant,
		state_change.non_closing_participant,
	)?;

	let canonical_identifier = channel_state.canonical_identifier;
	let update_submitted = channel_state.update_submitted;
	let balance_proof = &state_change.balance_proof;
	let (closing, non_closing) = channel_state
		.participants_mut(state_change.closing_participant)
		.ok_or(StateTransitionError::NotParticipant(state_change.closing_participant))?;

	if non_closing.is_closer || !closing.is_closer {
		return Err(StateTransitionError::UpdaterIsCloser)
	}
	if update_submitted {
		return Err(StateTransitionError::UpdateAlreadySubmitted)
	}
	if balance_proof.nonce <= closing.nonce {
		return Err(StateTransitionError::NonceNotIncreasing {
			nonce: balance_proof.nonce,
			recorded: closing.nonce,
		})
	}

	validate_signer(
		&balance_proof_message(canonical_identifier, balance_proof),
		&balance_proof.signature.0,
		state_change.closing_participant,
	)?;
	validate_signer(
		&balance_proof_update_message(canonical_identifier, balance_proof),
		&state_change.non_closing_signature.0,
		state_change.non_closing_participant,
	)?;

	closing.balance_hash = balance_proof.balance_hash;
	closing.nonce = balance_proof.nonce;
	channel_state.update_submitted = true;

	Ok(ChannelTransition::new(
		Some(channel_state),
		NonClosingBalanceProofUpdated {
			channel_identifier: canonical_identifier.channel_identifier,
			closing_participant: state_change.closing_participant,
			nonce: balance_proof.nonce,
			balance_hash: balance_proof.balance_hash,
		}
		.into(),
	))
}

fn handle_action_settle(
	channel_state: ChannelState,
	state_change: ActionChannelSettle,
	config: &TokenNetworkConfig,
	block_number: BlockNumber,
) -> TransitionResult {
	let data1 = state_change.participant1;
	let data2 = state_change.participant2;
	if data1.address >= data2.address {
		return Err(StateTransitionError::ParticipantsNotOrdered)
	}

	validate_status(&channel_state, ChannelStatus::Closed)?;
	validate_settlement_window_elapsed(&channel_state, block_number)?;
	validate_channel_participants(&channel_state, data1.address, data2.address)?;

	let participant1 = channel_state
		.participant(data1.address)
		.ok_or(StateTransitionError::NotParticipant(data1.address))?;
	let participant2 = channel_state
		.participant(data2.address)
		.ok_or(StateTransitionError::NotParticipant(data2.address))?;
	validate_settlement_data(participant1, &data1)?;
	validate_settlement_data(participant2, &data2)?;

	let payout = settlement::settle(
		&settlement_balance(participant1, &data1),
		&settlement_balance(participant2, &data2),
	)?;

	let channel_identifier = channel_state.channel_identifier();
	let mut transition = ChannelTransition::new(
		None,
		ChannelSettled {
			channel_identifier,
			participant1: data1.address,
			participant1_amount: payout.participant1_amount,
			participant1_locksroot: data1.locksroot,
			participant2: data2.address,
			participant2_amount: payout.participant2_amount,
			participant2_locksroot: data2.locksroot,
		}
		.into(),
	);

	for (data, partner, amount, locked) in [
		(&data1, data2.address, payout.participant1_amount, payout.participant1_locked),
		(&data2, data1.address, payout.participant2_amount, payout.participant2_locked),
	] {
		if amount > TokenAmount::zero() {
			transition.transfers.push(TokenTransfer {
				from: config.token_network_address,
				to: data.address,
				amount,
			});
		}
		if locked > TokenAmount::zero() {
			transition.unlocks.push(UnlockState {
				channel_identifier,
				locker: data.address,
				receiver: partner,
				locksroot: data.locksroot,
				locked_amount: locked,
			});
		}
	}

	Ok(transition)
}

/// Dispatch a state change to the channel it targets.
pub fn state_transition(
	channel_state: ChannelState,
	state_change: StateChange,
	config: &TokenNetworkConfig,
	block_number: BlockNumber,
) -> TransitionResult {
	match state_change {
		StateChange::ActionChannelSetTotalDeposit(inner) =>
			handle_action_set_total_deposit(channel_state, inner, config),
		StateChange::ActionChannelSetTotalWithdraw(inner) =>
			handle_action_set_total_withdraw(channel_state, inner, config, block_number),
		StateChange::ActionChannelClose(inner) =>
			handle_action_close(channel_state, inner, block_number),
		StateChange::ActionChannelUpdateNonClosingBalanceProof(inner) =>
			handle_action_update_non_closing_balance_proof(channel_state, inner, block_number),
		StateChange::ActionChannelSettle(inner) =>
			handle_action_settle(channel_state, inner, config, block_number),
		_ => Ok(ChannelTransition {
			new_state: Some(channel_state),
			events: vec![],
			transfers: vec![],
			unlocks: vec![],
		}),
	}
}
