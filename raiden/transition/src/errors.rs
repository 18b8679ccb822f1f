use raiden_state_machine::errors::{
	ErrorKind,
	StateTransitionError,
};
use raiden_storage::errors::StorageError;
use thiserror::Error;

use crate::chain::LedgerError;

pub type Result<T> = std::result::Result<T, TransitionError>;

#[derive(Error, Debug)]
pub enum TransitionError {
	#[error("Could not transition: {0}")]
	Transition(#[from] StateTransitionError),
	#[error("Token transfer failed: {0}")]
	Ledger(#[from] LedgerError),
	#[error("Storage failure: {0}")]
	Storage(#[from] StorageError),
}

impl TransitionError {
	/// Stable error code, shared with the state machine for rejected transitions.
	pub fn code(&self) -> &'static str {
		match self {
			Self::Transition(e) => e.code(),
			Self::Ledger(_) => "ledger_transfer_failed",
			Self::Storage(_) => "storage_failure",
		}
	}

	/// Class of a rejected transition. Ledger and storage failures carry none.
	pub fn kind(&self) -> Option<ErrorKind> {
		match self {
			Self::Transition(e) => Some(e.kind()),
			_ => None,
		}
	}

	/// Whether the same call can succeed once more blocks are mined.
	pub fn is_retryable_later(&self) -> bool {
		matches!(self, Self::Transition(e) if e.is_retryable_later())
	}
}
