use lazy_static::lazy_static;

use crate::types::{
	BalanceHash,
	Locksroot,
};

/// Length of a recoverable secp256k1 signature, `r ‖ s ‖ v`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Length of a packed lock, `expiration ‖ amount ‖ secrethash`.
pub const LOCK_ENCODED_LENGTH: usize = 96;

/// Smallest settlement window, in blocks, a token network accepts by default.
pub const DEFAULT_SETTLEMENT_TIMEOUT_MIN: u64 = 500;

/// Largest settlement window, in blocks, a token network accepts by default.
pub const DEFAULT_SETTLEMENT_TIMEOUT_MAX: u64 = 555428;

lazy_static! {
	pub static ref LOCKSROOT_OF_NO_LOCKS: Locksroot = Locksroot::zero();
	pub static ref EMPTY_BALANCE_HASH: BalanceHash = BalanceHash::zero();
}
