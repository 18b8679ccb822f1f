use std::cmp::min;

use raiden_primitives::{
	hashing::participants_hash,
	types::{
		TokenAmount,
		U256,
	},
};

use super::{
	channel::{
		self,
		utils::order_participants,
		validators::{
			validate_participants,
			validate_settle_timeout,
		},
	},
	locks,
};
use crate::{
	errors::StateTransitionError,
	types::{
		ActionChannelOpen,
		ActionChannelUnlock,
		ActionDeprecationSwitch,
		Block,
		ChannelOpened,
		ChannelState,
		ChannelStatus,
		ChannelUnlocked,
		DeprecationSwitch,
		Event,
		ParticipantState,
		StateChange,
		TokenNetworkState,
		TokenTransfer,
	},
};

/// Type alias for a result of a token network transition.
type TransitionResult = std::result::Result<TokenNetworkTransition, StateTransitionError>;

/// The new token network state, the events it emitted and the token
/// transfers which must be executed for the new state to be committed.
#[derive(Debug)]
pub struct TokenNetworkTransition {
	pub new_state: TokenNetworkState,
	pub events: Vec<Event>,
	pub transfers: Vec<TokenTransfer>,
}

impl TokenNetworkTransition {
	fn unchanged(new_state: TokenNetworkState) -> Self {
		Self { new_state, events: vec![], transfers: vec![] }
	}
}

fn debit_network_balance(
	token_network_state: &mut TokenNetworkState,
	amount: TokenAmount,
) -> Result<(), StateTransitionError> {
	token_network_state.network_balance =
		token_network_state.network_balance.checked_sub(amount).ok_or_else(|| {
			StateTransitionError::ArithmeticInvariantViolation(format!(
				"paying out {} exceeds the token network balance {}",
				amount, token_network_state.network_balance
			))
		})?;
	Ok(())
}

fn outgoing_amount(
	token_network_state: &TokenNetworkState,
	transfers: &[TokenTransfer],
) -> TokenAmount {
	transfers
		.iter()
		.filter(|transfer| transfer.from == token_network_state.config.token_network_address)
		.fold(TokenAmount::zero(), |sum, transfer| sum.saturating_add(transfer.amount))
}

fn incoming_amount(
	token_network_state: &TokenNetworkState,
	transfers: &[TokenTransfer],
) -> TokenAmount {
	transfers
		.iter()
		.filter(|transfer| transfer.to == token_network_state.config.token_network_address)
		.fold(TokenAmount::zero(), |sum, transfer| sum.saturating_add(transfer.amount))
}

fn handle_block(
	mut token_network_state: TokenNetworkState,
	state_change: Block,
) -> TransitionResult {
	if state_change.block_number > token_network_state.block_number {
		token_network_state.block_number = state_change.block_number;
	}
	Ok(TokenNetworkTransition::unchanged(token_network_state))
}

fn handle_action_open(
	mut token_network_state: TokenNetworkState,
	state_change: ActionChannelOpen,
) -> TransitionResult {
	if token_network_state.safety_deprecation_switch {
		return Err(StateTransitionError::Deprecated)
	}
	validate_participants(state_change.participant1, state_change.participant2)?;
	validate_settle_timeout(&token_network_state.config, state_change.settle_timeout)?;

	let pair_hash = participants_hash(state_change.participant1, state_change.participant2);
	if let Some(channel_identifier) =
		token_network_state.participants_to_channelidentifiers.get(&pair_hash)
	{
		return Err(StateTransitionError::ChannelAlreadyExists(*channel_identifier))
	}

	let channel_identifier = token_network_state
		.channel_counter
		.checked_add(U256::one())
		.ok_or(StateTransitionError::ChannelIdentifiersExhausted)?;
	let (participant1, participant2) =
		order_participants(state_change.participant1, state_change.participant2);

	let channel_state = ChannelState {
		canonical_identifier: token_network_state.canonical_identifier(channel_identifier),
		settle_timeout: state_change.settle_timeout,
		settle_block_number: token_network_state
			.block_number
			.saturating_add(state_change.settle_timeout),
		status: ChannelStatus::Opened,
		participant1: ParticipantState::new(participant1),
		participant2: ParticipantState::new(participant2),
		update_submitted: false,
	};

	token_network_state.channel_counter = channel_identifier;
	token_network_state.participants_to_channelidentifiers.insert(pair_hash, channel_identifier);
	token_network_state
		.channelidentifiers_to_channels
		.insert(channel_identifier, channel_state);

	Ok(TokenNetworkTransition {
		new_state: token_network_state,
		events: vec![ChannelOpened {
			channel_identifier,
			participant1,
			participant2,
			settle_timeout: state_change.settle_timeout,
		}
		.into()],
		transfers: vec![],
	})
}

fn subdispatch_to_channel(
	mut token_network_state: TokenNetworkState,
	state_change: StateChange,
	channel_identifier: U256,
) -> TransitionResult {
	let channel_state = token_network_state
		.channelidentifiers_to_channels
		.get(&channel_identifier)
		.cloned()
		.ok_or(StateTransitionError::UnknownChannel(channel_identifier))?;
	let participant1 = channel_state.participant1.address;
	let participant2 = channel_state.participant2.address;

	let is_deposit = matches!(state_change, StateChange::ActionChannelSetTotalDeposit(_));
	if is_deposit && token_network_state.safety_deprecation_switch {
		return Err(StateTransitionError::Deprecated)
	}

	let result = channel::state_transition(
		channel_state,
		state_change,
		&token_network_state.config,
		token_network_state.block_number,
	)?;

	let added = incoming_amount(&token_network_state, &result.transfers);
	if !added.is_zero() {
		let limit = token_network_state.config.token_network_deposit_limit;
		let network_balance = token_network_state.network_balance.checked_add(added);
		match network_balance {
			Some(balance) if limit.is_zero() || balance <= limit =>
				token_network_state.network_balance = balance,
			_ => return Err(StateTransitionError::NetworkDepositLimitExceeded { added, limit }),
		}
	}
	let paid = outgoing_amount(&token_network_state, &result.transfers);
	debit_network_balance(&mut token_network_state, paid)?;

	match result.new_state {
		Some(channel_state) => {
			token_network_state
				.channelidentifiers_to_channels
				.insert(channel_identifier, channel_state);
		},
		None => {
			token_network_state.channelidentifiers_to_channels.remove(&channel_identifier);
			token_network_state
				.participants_to_channelidentifiers
				.remove(&participants_hash(participant1, participant2));
			for unlock in result.unlocks {
				token_network_state.unlocks.insert(unlock.identifier(), unlock);
			}
		},
	}

	Ok(TokenNetworkTransition {
		new_state: token_network_state,
		events: result.events,
		transfers: result.transfers,
	})
}

fn handle_action_unlock(
	mut token_network_state: TokenNetworkState,
	state_change: ActionChannelUnlock,
) -> TransitionResult {
	if token_network_state
		.channelidentifiers_to_channels
		.contains_key(&state_change.channel_identifier)
	{
		return Err(StateTransitionError::ChannelNotSettled(state_change.channel_identifier))
	}

	let unlock = token_network_state
		.unlock(state_change.channel_identifier, state_change.sender, state_change.receiver)
		.cloned()
		.ok_or(StateTransitionError::NothingToUnlock)?;
	if unlock.locked_amount.is_zero() {
		return Err(StateTransitionError::NothingToUnlock)
	}

	let secret_reveals = &state_change.secret_reveals;
	let resolution = locks::resolve(&state_change.locks.0, |secrethash| {
		secret_reveals.get(secrethash).copied().unwrap_or_default()
	})?;
	if resolution.locksroot != unlock.locksroot {
		return Err(StateTransitionError::LocksrootMismatch {
			expected: unlock.locksroot,
			computed: resolution.locksroot,
		})
	}

	let unlocked_amount = min(resolution.claimed_amount, unlock.locked_amount);
	let returned_tokens = unlock.locked_amount - unlocked_amount;

	token_network_state.unlocks.remove(&unlock.identifier());
	debit_network_balance(&mut token_network_state, unlock.locked_amount)?;

	let token_network_address = token_network_state.config.token_network_address;
	let transfers = [(unlock.receiver, unlocked_amount), (unlock.locker, returned_tokens)]
		.into_iter()
		.filter(|(_, amount)| !amount.is_zero())
		.map(|(to, amount)| TokenTransfer { from: token_network_address, to, amount })
		.collect();

	Ok(TokenNetworkTransition {
		new_state: token_network_state,
		events: vec![ChannelUnlocked {
			channel_identifier: unlock.channel_identifier,
			receiver: unlock.receiver,
			sender: unlock.locker,
			locksroot: unlock.locksroot,
			unlocked_amount,
			returned_tokens,
		}
		.into()],
		transfers,
	})
}

fn handle_action_deprecation_switch(
	mut token_network_state: TokenNetworkState,
	state_change: ActionDeprecationSwitch,
) -> TransitionResult {
	if state_change.caller != token_network_state.config.deprecation_executor {
		return Err(StateTransitionError::NotDeprecationExecutor(state_change.caller))
	}
	if token_network_state.safety_deprecation_switch {
		return Ok(TokenNetworkTransition::unchanged(token_network_state))
	}

	token_network_state.safety_deprecation_switch = true;
	Ok(TokenNetworkTransition {
		new_state: token_network_state,
		events: vec![DeprecationSwitch { new_value: true }.into()],
		transfers: vec![],
	})
}

/// Apply `state_change` to the token network.
///
/// The input state is consumed. On error the caller keeps its own copy of the
/// previous state, no partial result is ever returned.
pub fn state_transition(
	token_network_state: TokenNetworkState,
	state_change: StateChange,
) -> TransitionResult {
	match state_change {
		StateChange::Block(inner) => handle_block(token_network_state, inner),
		StateChange::ActionChannelOpen(inner) => handle_action_open(token_network_state, inner),
		StateChange::ActionChannelSetTotalDeposit(ref inner) => {
			let channel_identifier = inner.channel_identifier;
			subdispatch_to_channel(token_network_state, state_change, channel_identifier)
		},
		StateChange::ActionChannelSetTotalWithdraw(ref inner) => {
			let channel_identifier = inner.channel_identifier;
			subdispatch_to_channel(token_network_state, state_change, channel_identifier)
		},
		StateChange::ActionChannelClose(ref inner) => {
			let channel_identifier = inner.channel_identifier;
			subdispatch_to_channel(token_network_state, state_change, channel_identifier)
		},
		StateChange::ActionChannelUpdateNonClosingBalanceProof(ref inner) => {
			let channel_identifier = inner.channel_identifier;
			subdispatch_to_channel(token_network_state, state_change, channel_identifier)
		},
		StateChange::ActionChannelSettle(ref inner) => {
			let channel_identifier = inner.channel_identifier;
			subdispatch_to_channel(token_network_state, state_change, channel_identifier)
		},
		StateChange::ActionChannelUnlock(inner) => handle_action_unlock(token_network_state, inner),
		StateChange::ActionDeprecationSwitch(inner) =>
			handle_action_deprecation_switch(token_network_state, inner),
	}
}
