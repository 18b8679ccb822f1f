use std::sync::Arc;

use raiden_primitives::{
	config::TokenNetworkConfig,
	types::BlockNumber,
};
use raiden_state_machine::{
	machine::token_network::{
		self,
		TokenNetworkTransition,
	},
	types::{
		Event,
		StateChange,
		TokenNetworkState,
	},
};
use raiden_storage::{
	errors::StorageError,
	types::StorageID,
	StateStorage,
	SNAPSHOT_STATE_CHANGE_COUNT,
};
use tracing::{
	debug,
	error,
};

use crate::errors::Result;

/// Owns the current token network state and its write-ahead log.
pub struct StateManager {
	pub storage: Arc<StateStorage>,
	pub current_state: TokenNetworkState,
	state_change_last_id: Option<StorageID>,
	state_change_count: u16,
}

impl StateManager {
	/// Restore the state from the latest snapshot and the state changes stored after it, or
	/// start a new token network at `block_number`.
	pub fn restore_or_init_state(
		storage: Arc<StateStorage>,
		config: TokenNetworkConfig,
		block_number: BlockNumber,
	) -> Result<Self> {
		let snapshot = storage.get_snapshot_before_state_change(StorageID::max())?;

		let (current_state, state_changes) = match snapshot {
			Some(snapshot) => {
				debug!(
					message = "Restoring state",
					snapshot = snapshot.identifier.to_string(),
					block_number = snapshot.data.block_number.to_string(),
				);
				if snapshot.data.config != config {
					debug!(message = "Stored configuration takes precedence over the given one");
				}
				let state_changes = storage.get_state_changes_in_range(
					snapshot.state_change_identifier,
					StorageID::max(),
				)?;
				(snapshot.data, state_changes)
			},
			None => {
				debug!(message = "Initializing state", block_number = block_number.to_string());
				let current_state = TokenNetworkState::new(config, block_number);
				storage.store_snapshot(&current_state, None, 0)?;
				(current_state, storage.state_changes()?)
			},
		};

		let mut state_manager =
			Self { storage, current_state, state_change_last_id: None, state_change_count: 0 };

		for record in state_changes {
			let transition = state_manager.dispatch(record.data)?;
			state_manager.current_state = transition.new_state;
			state_manager.state_change_last_id = Some(record.identifier);
		}

		Ok(state_manager)
	}

	/// Apply `state_change` to a copy of the current state. Nothing is committed.
	pub fn dispatch(&self, state_change: StateChange) -> Result<TokenNetworkTransition> {
		let current_state = self.current_state.clone();
		Ok(token_network::state_transition(current_state, state_change)?)
	}

	/// Log `state_change` with its events and make `new_state` current.
	pub fn commit(
		&mut self,
		state_change: &StateChange,
		new_state: TokenNetworkState,
		events: &[Event],
	) -> std::result::Result<(), StorageError> {
		let state_change_id = self.storage.store_state_change_with_events(state_change, events)?;

		self.current_state = new_state;
		self.state_change_last_id = Some(state_change_id);
		self.state_change_count = self.state_change_count.wrapping_add(1);
		self.maybe_snapshot();
		Ok(())
	}

	/// Store a snapshot of the current state.
	pub fn snapshot(&self) -> std::result::Result<StorageID, StorageError> {
		self.storage.store_snapshot(
			&self.current_state,
			self.state_change_last_id,
			u32::from(self.state_change_count),
		)
	}

	fn maybe_snapshot(&mut self) {
		if self.state_change_count % SNAPSHOT_STATE_CHANGE_COUNT != 0 {
			return
		}
		// A failed snapshot leaves the log intact.
		if let Err(e) = self.snapshot() {
			error!(message = "Could not store snapshot", error = e.to_string());
		}
		self.state_change_count = 0;
	}
}
