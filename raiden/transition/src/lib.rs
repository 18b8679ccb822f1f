//! Applies state changes of a token network against the chain collaborators.
//!
//! A state change is first run against a copy of the state. Its token transfers
//! are then executed on the ledger, and only once all of them went through is
//! the state change logged and the new state made current. A failed transfer
//! reverts the transfers made before it.
use std::{
	collections::HashMap,
	sync::Arc,
};

use parking_lot::RwLock;
use raiden_primitives::{
	traits::Checksum,
	types::{
		Address,
		BlockExpiration,
		BlockNumber,
		ChannelIdentifier,
		EncodedLock,
		LockedAmount,
		Locksroot,
		Signature,
		SettleTimeout,
		TokenAmount,
	},
};
use raiden_state_machine::{
	machine::locks,
	types::{
		ActionChannelClose,
		ActionChannelOpen,
		ActionChannelSetTotalDeposit,
		ActionChannelSetTotalWithdraw,
		ActionChannelSettle,
		ActionChannelUnlock,
		ActionChannelUpdateNonClosingBalanceProof,
		ActionDeprecationSwitch,
		BalanceProofState,
		Block,
		ChannelStatus,
		Event,
		SettlementData,
		StateChange,
		TokenNetworkState,
		TokenTransfer,
	},
	views::{
		self,
		ParticipantInfo,
	},
};
use tracing::{
	debug,
	error,
	info,
	warn,
};

use crate::{
	chain::{
		BlockSource,
		SecretRegistry,
		TokenLedger,
	},
	errors::{
		Result,
		TransitionError,
	},
	manager::StateManager,
};

/// Chain collaborators and their in-memory implementations.
pub mod chain;
/// Transition errors.
pub mod errors;
/// Transition state manager.
pub mod manager;
#[cfg(test)]
mod tests;

/// Serializes state changes into the token network, one at a time.
pub struct Transitioner {
	state_manager: Arc<RwLock<StateManager>>,
	block_source: Arc<dyn BlockSource>,
	secret_registry: Arc<dyn SecretRegistry>,
	token_ledger: Arc<dyn TokenLedger>,
}

impl Transitioner {
	/// Create an instance of `Transitioner`.
	pub fn new(
		state_manager: Arc<RwLock<StateManager>>,
		block_source: Arc<dyn BlockSource>,
		secret_registry: Arc<dyn SecretRegistry>,
		token_ledger: Arc<dyn TokenLedger>,
	) -> Self {
		Self { state_manager, block_source, secret_registry, token_ledger }
	}

	/// Bring the token network to the current block of the chain.
	pub fn sync_block(&self) -> Result<()> {
		let mut state_manager = self.state_manager.write();
		self.advance_block(&mut state_manager)
	}

	/// Apply `state_change` at the current block of the chain.
	pub fn transition(&self, state_change: StateChange) -> Result<Vec<Event>> {
		let mut state_manager = self.state_manager.write();
		self.advance_block(&mut state_manager)?;
		self.apply(&mut state_manager, state_change)
	}

	pub fn open_channel(
		&self,
		participant1: Address,
		participant2: Address,
		settle_timeout: SettleTimeout,
	) -> Result<ChannelIdentifier> {
		info!(
			message = "Opening channel.",
			participant1 = participant1.checksum(),
			participant2 = participant2.checksum(),
			settle_timeout = settle_timeout.to_string(),
		);
		let events = self.transition(
			ActionChannelOpen { participant1, participant2, settle_timeout }.into(),
		)?;
		let channel_identifier = events
			.iter()
			.find_map(|event| match event {
				Event::ChannelOpened(inner) => Some(inner.channel_identifier),
				_ => None,
			})
			.unwrap_or_default();
		Ok(channel_identifier)
	}

	pub fn set_total_deposit(
		&self,
		channel_identifier: ChannelIdentifier,
		participant: Address,
		total_deposit: TokenAmount,
		partner: Address,
	) -> Result<Vec<Event>> {
		info!(
			message = "Depositing to channel.",
			channel_identifier = channel_identifier.to_string(),
			participant = participant.checksum(),
			total_deposit = total_deposit.to_string(),
		);
		self.transition(
			ActionChannelSetTotalDeposit { channel_identifier, participant, total_deposit, partner }
				.into(),
		)
	}

	#[allow(clippy::too_many_arguments)]
	pub fn set_total_withdraw(
		&self,
		channel_identifier: ChannelIdentifier,
		participant: Address,
		total_withdraw: TokenAmount,
		expiration_block: BlockExpiration,
		partner: Address,
		participant_signature: Signature,
		partner_signature: Signature,
	) -> Result<Vec<Event>> {
		info!(
			message = "Withdraw from channel.",
			channel_identifier = channel_identifier.to_string(),
			participant = participant.checksum(),
			total_withdraw = total_withdraw.to_string(),
		);
		self.transition(
			ActionChannelSetTotalWithdraw {
				channel_identifier,
				participant,
				total_withdraw,
				expiration_block,
				partner,
				participant_signature,
				partner_signature,
			}
			.into(),
		)
	}

	/// Close with the balance proof `non_closing_participant` signed.
	pub fn close_channel(
		&self,
		channel_identifier: ChannelIdentifier,
		closing_participant: Address,
		non_closing_participant: Address,
		balance_proof: BalanceProofState,
		closing_signature: Signature,
	) -> Result<Vec<Event>> {
		info!(
			message = "Closing channel.",
			channel_identifier = channel_identifier.to_string(),
			closing_participant = closing_participant.checksum(),
			nonce = balance_proof.nonce.to_string(),
		);
		self.transition(
			ActionChannelClose {
				channel_identifier,
				closing_participant,
				non_closing_participant,
				balance_proof,
				closing_signature,
			}
			.into(),
		)
	}

	/// Register the closer's latest balance proof on behalf of `non_closing_participant`.
	pub fn update_non_closing_balance_proof(
		&self,
		channel_identifier: ChannelIdentifier,
		closing_participant: Address,
		non_closing_participant: Address,
		balance_proof: BalanceProofState,
		non_closing_signature: Signature,
	) -> Result<Vec<Event>> {
		info!(
			message = "Updating non closing balance proof.",
			channel_identifier = channel_identifier.to_string(),
			non_closing_participant = non_closing_participant.checksum(),
			nonce = balance_proof.nonce.to_string(),
		);
		self.transition(
			ActionChannelUpdateNonClosingBalanceProof {
				channel_identifier,
				closing_participant,
				non_closing_participant,
				balance_proof,
				non_closing_signature,
			}
			.into(),
		)
	}

	/// Settle with the balance data of both participants, lower address first.
	pub fn settle_channel(
		&self,
		channel_identifier: ChannelIdentifier,
		participant1: SettlementData,
		participant2: SettlementData,
	) -> Result<Vec<Event>> {
		info!(
			message = "Settling channel.",
			channel_identifier = channel_identifier.to_string(),
			participant1 = participant1.address.checksum(),
			participant2 = participant2.address.checksum(),
		);
		self.transition(
			ActionChannelSettle { channel_identifier, participant1, participant2 }.into(),
		)
	}

	/// Release the locks `sender` committed to towards `receiver` at settlement.
	///
	/// Reveal blocks are read from the secret registry here, so the logged state
	/// change replays to the same result.
	pub fn unlock(
		&self,
		channel_identifier: ChannelIdentifier,
		receiver: Address,
		sender: Address,
		locks: EncodedLock,
	) -> Result<Vec<Event>> {
		info!(
			message = "Unlocking.",
			channel_identifier = channel_identifier.to_string(),
			receiver = receiver.checksum(),
			sender = sender.checksum(),
		);
		let secret_reveals = locks::decode_locks(&locks.0)?
			.into_iter()
			.map(|lock| {
				let reveal_block = self.secret_registry.reveal_block(&lock.secrethash);
				(lock.secrethash, reveal_block)
			})
			.collect::<HashMap<_, _>>();
		self.transition(
			ActionChannelUnlock { channel_identifier, receiver, sender, locks, secret_reveals }
				.into(),
		)
	}

	pub fn deprecate(&self, caller: Address) -> Result<Vec<Event>> {
		info!(message = "Deprecating token network.", caller = caller.checksum());
		self.transition(ActionDeprecationSwitch { caller }.into())
	}

	/// A copy of the current state.
	pub fn state(&self) -> TokenNetworkState {
		self.state_manager.read().current_state.clone()
	}

	pub fn block_number(&self) -> BlockNumber {
		self.state_manager.read().current_state.block_number
	}

	pub fn channel_identifier(&self, participant: Address, partner: Address) -> ChannelIdentifier {
		views::get_channel_identifier(
			&self.state_manager.read().current_state,
			participant,
			partner,
		)
	}

	pub fn channel_info(
		&self,
		channel_identifier: ChannelIdentifier,
		participant1: Address,
		participant2: Address,
	) -> (BlockNumber, ChannelStatus) {
		views::get_channel_info(
			&self.state_manager.read().current_state,
			channel_identifier,
			participant1,
			participant2,
		)
	}

	pub fn participant_info(
		&self,
		channel_identifier: ChannelIdentifier,
		participant: Address,
		partner: Address,
	) -> ParticipantInfo {
		views::get_channel_participant_info(
			&self.state_manager.read().current_state,
			channel_identifier,
			participant,
			partner,
		)
	}

	pub fn unlock_info(
		&self,
		channel_identifier: ChannelIdentifier,
		locker: Address,
		receiver: Address,
	) -> (Locksroot, LockedAmount) {
		views::get_unlock_info(
			&self.state_manager.read().current_state,
			channel_identifier,
			locker,
			receiver,
		)
	}

	fn advance_block(&self, state_manager: &mut StateManager) -> Result<()> {
		let block_number = self.block_source.current_block();
		if block_number <= state_manager.current_state.block_number {
			return Ok(())
		}
		self.apply(state_manager, Block { block_number }.into())?;
		Ok(())
	}

	fn apply(
		&self,
		state_manager: &mut StateManager,
		state_change: StateChange,
	) -> Result<Vec<Event>> {
		debug!(message = "Transition", state_change = state_change.type_name());

		let transition = match state_manager.dispatch(state_change.clone()) {
			Ok(transition) => transition,
			Err(e) => {
				warn!(
					message = "Transition rejected",
					state_change = state_change.type_name(),
					code = e.code(),
					error = e.to_string(),
				);
				return Err(e)
			},
		};

		self.execute_transfers(&transition.transfers)?;

		if let Err(e) =
			state_manager.commit(&state_change, transition.new_state, &transition.events)
		{
			error!(
				message = "Could not store state change",
				state_change = state_change.type_name(),
				error = e.to_string(),
			);
			self.compensate(&transition.transfers);
			return Err(TransitionError::Storage(e))
		}

		for event in transition.events.iter() {
			debug!(
				message = "Resulting event from state change",
				state_change = state_change.type_name(),
				event = event.type_name(),
			);
		}
		Ok(transition.events)
	}

	/// Execute `transfers` in order. On failure the executed ones are reverted.
	fn execute_transfers(&self, transfers: &[TokenTransfer]) -> Result<()> {
		for (index, transfer) in transfers.iter().enumerate() {
			if let Err(e) = self.token_ledger.transfer(transfer.from, transfer.to, transfer.amount)
			{
				error!(
					message = "Token transfer failed",
					from = transfer.from.checksum(),
					to = transfer.to.checksum(),
					amount = transfer.amount.to_string(),
					error = e.to_string(),
				);
				self.compensate(&transfers[..index]);
				return Err(e.into())
			}
		}
		Ok(())
	}

	/// Revert `transfers`, last one first.
	fn compensate(&self, transfers: &[TokenTransfer]) {
		for transfer in transfers.iter().rev() {
			warn!(
				message = "Compensating token transfer",
				from = transfer.from.checksum(),
				to = transfer.to.checksum(),
				amount = transfer.amount.to_string(),
			);
			if let Err(e) = self.token_ledger.transfer(transfer.to, transfer.from, transfer.amount)
			{
				error!(message = "Could not compensate token transfer", error = e.to_string());
			}
		}
	}
}
