use derive_more::Display;
use raiden_primitives::{
	signing::SignatureError,
	types::{
		Address,
		BlockExpiration,
		BlockNumber,
		ChannelIdentifier,
		Locksroot,
		Nonce,
		SettleTimeout,
		TokenAmount,
	},
};
use thiserror::Error;

use crate::types::ChannelStatus;

/// Class of a state transition failure.
///
/// `Validation` and `Precondition` failures leave the state untouched and may
/// be retried with corrected input or at a later block. `Fatal` failures must
/// halt the transition.
#[derive(Copy, Clone, Display, Debug, Eq, PartialEq)]
pub enum ErrorKind {
	#[display(fmt = "validation")]
	Validation,
	#[display(fmt = "precondition")]
	Precondition,
	#[display(fmt = "fatal")]
	Fatal,
}

/// The state transition error type.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum StateTransitionError {
	#[error("Participant address is zero")]
	ZeroAddress,
	#[error("Participants are the same address `{0}`")]
	SameParticipants(Address),
	#[error("Settle timeout {timeout} is outside of [{min}, {max}]")]
	SettleTimeoutOutOfRange { timeout: SettleTimeout, min: SettleTimeout, max: SettleTimeout },
	#[error("Invalid signature: {0}")]
	InvalidSignature(#[from] SignatureError),
	#[error("Signature recovers to `{recovered}`, expected `{expected}`")]
	InvalidSigner { expected: Address, recovered: Address },
	#[error("Packed locks length {0} is not a multiple of 96")]
	InvalidLocksEncoding(usize),
	#[error("Participants must be ordered by address")]
	ParticipantsNotOrdered,
	#[error("Channel already exists between participants: `{0}`")]
	ChannelAlreadyExists(ChannelIdentifier),
	#[error("Channel `{0}` does not exist")]
	UnknownChannel(ChannelIdentifier),
	#[error("Address `{0}` is not a participant of the channel")]
	NotParticipant(Address),
	#[error("Channel `{channel_identifier}` is {status}, expected {expected}")]
	InvalidChannelStatus {
		channel_identifier: ChannelIdentifier,
		status: ChannelStatus,
		expected: ChannelStatus,
	},
	#[error("Settlement window ends at block {settle_block_number}, current block {current_block}")]
	SettlementWindowNotElapsed { settle_block_number: BlockNumber, current_block: BlockNumber },
	#[error("Settlement window ended at {settle_block_number}, current block {current_block}")]
	SettlementWindowExpired { settle_block_number: BlockNumber, current_block: BlockNumber },
	#[error("Withdraw expired at block {expiration_block}, current block {current_block}")]
	WithdrawExpired { expiration_block: BlockExpiration, current_block: BlockNumber },
	#[error("Nonce {nonce} is not larger than recorded nonce {recorded}")]
	NonceNotIncreasing { nonce: Nonce, recorded: Nonce },
	#[error("Non closing balance proof was already updated")]
	UpdateAlreadySubmitted,
	#[error("The closing participant cannot update its own closing")]
	UpdaterIsCloser,
	#[error("Balance data of `{0}` does not match the recorded balance hash")]
	BalanceHashMismatch(Address),
	#[error("Locksroot mismatch, expected `{expected}`, computed `{computed}`")]
	LocksrootMismatch { expected: Locksroot, computed: Locksroot },
	#[error("Nothing to unlock")]
	NothingToUnlock,
	#[error("Channel `{0}` is not settled")]
	ChannelNotSettled(ChannelIdentifier),
	#[error("Token network is deprecated")]
	Deprecated,
	#[error("Address `{0}` is not the deprecation executor")]
	NotDeprecationExecutor(Address),
	#[error("Total deposit {total_deposit} plus partner deposit {partner_deposit} overflows")]
	DepositOverflow { total_deposit: TokenAmount, partner_deposit: TokenAmount },
	#[error("No channel identifiers left")]
	ChannelIdentifiersExhausted,
	#[error("Total deposit {total_deposit} is not larger than current deposit {current}")]
	DepositNotIncreasing { total_deposit: TokenAmount, current: TokenAmount },
	#[error("Total deposit {total_deposit} exceeds the participant limit {limit}")]
	ParticipantDepositLimitExceeded { total_deposit: TokenAmount, limit: TokenAmount },
	#[error("Deposit of {added} exceeds the token network limit {limit}")]
	NetworkDepositLimitExceeded { added: TokenAmount, limit: TokenAmount },
	#[error("Total withdraw {total_withdraw} is not larger than current withdraw {current}")]
	WithdrawNotIncreasing { total_withdraw: TokenAmount, current: TokenAmount },
	#[error("Withdrawn amounts exceed the channel deposit")]
	WithdrawExceedsDeposit,
	#[error("Arithmetic invariant violated: {0}")]
	ArithmeticInvariantViolation(String),
}

impl StateTransitionError {
	/// The class of the failure.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::ZeroAddress |
			Self::SameParticipants(_) |
			Self::SettleTimeoutOutOfRange { .. } |
			Self::InvalidSignature(_) |
			Self::InvalidSigner { .. } |
			Self::InvalidLocksEncoding(_) |
			Self::ParticipantsNotOrdered |
			Self::DepositOverflow { .. } => ErrorKind::Validation,
			Self::ArithmeticInvariantViolation(_) => ErrorKind::Fatal,
			_ => ErrorKind::Precondition,
		}
	}

	/// Stable identifier of the failure, suitable for off-chain coordination.
	pub fn code(&self) -> &'static str {
		match self {
			Self::ZeroAddress => "zero_address",
			Self::SameParticipants(_) => "same_participants",
			Self::SettleTimeoutOutOfRange { .. } => "settle_timeout_out_of_range",
			Self::InvalidSignature(_) => "invalid_signature",
			Self::InvalidSigner { .. } => "invalid_signer",
			Self::InvalidLocksEncoding(_) => "invalid_locks_encoding",
			Self::ParticipantsNotOrdered => "participants_not_ordered",
			Self::ChannelAlreadyExists(_) => "channel_already_exists",
			Self::UnknownChannel(_) => "unknown_channel",
			Self::NotParticipant(_) => "not_participant",
			Self::InvalidChannelStatus { .. } => "invalid_channel_status",
			Self::SettlementWindowNotElapsed { .. } => "settlement_window_not_elapsed",
			Self::SettlementWindowExpired { .. } => "settlement_window_expired",
			Self::WithdrawExpired { .. } => "withdraw_expired",
			Self::NonceNotIncreasing { .. } => "nonce_not_increasing",
			Self::UpdateAlreadySubmitted => "update_already_submitted",
			Self::UpdaterIsCloser => "updater_is_closer",
			Self::BalanceHashMismatch(_) => "balance_hash_mismatch",
			Self::LocksrootMismatch { .. } => "locksroot_mismatch",
			Self::NothingToUnlock => "nothing_to_unlock",
			Self::ChannelNotSettled(_) => "channel_not_settled",
			Self::Deprecated => "deprecated",
			Self::NotDeprecationExecutor(_) => "not_deprecation_executor",
			Self::DepositOverflow { .. } => "deposit_overflow",
			Self::ChannelIdentifiersExhausted => "channel_identifiers_exhausted",
			Self::DepositNotIncreasing { .. } => "deposit_not_increasing",
			Self::ParticipantDepositLimitExceeded { .. } => "participant_deposit_limit_exceeded",
			Self::NetworkDepositLimitExceeded { .. } => "network_deposit_limit_exceeded",
			Self::WithdrawNotIncreasing { .. } => "withdraw_not_increasing",
			Self::WithdrawExceedsDeposit => "withdraw_exceeds_deposit",
			Self::ArithmeticInvariantViolation(_) => "arithmetic_invariant_violation",
		}
	}

	/// True when the failure may disappear by retrying at a later block.
	pub fn is_retryable_later(&self) -> bool {
		matches!(self, Self::SettlementWindowNotElapsed { .. })
	}
}
