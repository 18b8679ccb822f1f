//! Settlement of a closed channel.
//!
//! A participant's maximum transferred amount is the amount it transferred
//! plus the amount it still has locked, since any pending lock may end up
//! claimed by the partner. The locked amounts are then carved out of the
//! receivable of the partner and kept for unlocking.
use std::cmp::min;

use raiden_primitives::types::{
	LockedAmount,
	TokenAmount,
	U256,
};
use rug::{
	integer::Order,
	Complete,
	Integer,
};

use crate::errors::StateTransitionError;

/// Balance data of one participant, as revealed at settlement.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SettlementBalance {
	pub deposit: TokenAmount,
	pub withdrawn: TokenAmount,
	pub transferred: TokenAmount,
	pub locked: LockedAmount,
}

impl SettlementBalance {
	pub fn new(
		deposit: TokenAmount,
		withdrawn: TokenAmount,
		transferred: TokenAmount,
		locked: LockedAmount,
	) -> Self {
		Self { deposit, withdrawn, transferred, locked }
	}
}

/// Amounts paid out at settlement and amounts kept locked for unlocking.
///
/// `participant1_locked` is the part of participant1's pending locks which is
/// backed by participant2's receivable, and vice versa.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Payout {
	pub participant1_amount: TokenAmount,
	pub participant2_amount: TokenAmount,
	pub participant1_locked: LockedAmount,
	pub participant2_locked: LockedAmount,
	pub total: TokenAmount,
}

/// Payout computed over unbounded integers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IdealizedPayout {
	pub participant1_amount: Integer,
	pub participant2_amount: Integer,
	pub participant1_locked: Integer,
	pub participant2_locked: Integer,
	pub total: Integer,
}

impl IdealizedPayout {
	/// Narrow into a `Payout`, if every amount fits into 256 bits.
	pub fn to_payout(&self) -> Option<Payout> {
		Some(Payout {
			participant1_amount: integer_to_u256(&self.participant1_amount)?,
			participant2_amount: integer_to_u256(&self.participant2_amount)?,
			participant1_locked: integer_to_u256(&self.participant1_locked)?,
			participant2_locked: integer_to_u256(&self.participant2_locked)?,
			total: integer_to_u256(&self.total)?,
		})
	}
}

pub fn u256_to_integer(value: U256) -> Integer {
	let mut bytes = [0u8; 32];
	value.to_big_endian(&mut bytes);
	Integer::from_digits(&bytes[..], Order::MsfBe)
}

pub fn integer_to_u256(value: &Integer) -> Option<U256> {
	if *value < 0 {
		return None
	}
	let digits = value.to_digits::<u8>(Order::MsfBe);
	if digits.len() > 32 {
		return None
	}
	Some(U256::from_big_endian(&digits))
}

/// Subtraction which never underflows.
///
/// Returns `(a - min(a, b), min(a, b))`, the difference and the part of `b`
/// which could actually be subtracted.
pub fn failsafe_subtract(a: U256, b: U256) -> (U256, U256) {
	let covered = min(a, b);
	(a - covered, covered)
}

/// Addition modulo 2^256.
pub fn wrapping_add(a: U256, b: U256) -> U256 {
	a.overflowing_add(b).0
}

fn max_transferred(balance: &SettlementBalance) -> U256 {
	wrapping_add(balance.transferred, balance.locked)
}

/// Settlement as evaluated on-chain, over 256 bit words.
///
/// Never pays out more than the available deposit, whatever the inputs.
pub fn settle(
	participant1: &SettlementBalance,
	participant2: &SettlementBalance,
) -> Result<Payout, StateTransitionError> {
	let total_deposit = wrapping_add(participant1.deposit, participant2.deposit);
	let (total, _) = failsafe_subtract(total_deposit, participant1.withdrawn);
	let (total, _) = failsafe_subtract(total, participant2.withdrawn);

	let participant1_max_transferred = max_transferred(participant1);
	let participant2_max_transferred = max_transferred(participant2);

	let participant1_receivable = if participant2_max_transferred >= participant1_max_transferred {
		let gained = participant2_max_transferred - participant1_max_transferred;
		failsafe_subtract(wrapping_add(participant1.deposit, gained), participant1.withdrawn).0
	} else {
		let lost = participant1_max_transferred - participant2_max_transferred;
		let (remaining, _) = failsafe_subtract(participant1.deposit, lost);
		failsafe_subtract(remaining, participant1.withdrawn).0
	};

	let participant1_amount = min(participant1_receivable, total);
	let participant2_amount = total - participant1_amount;

	let (participant1_amount, participant2_locked) =
		failsafe_subtract(participant1_amount, participant2.locked);
	let (participant2_amount, participant1_locked) =
		failsafe_subtract(participant2_amount, participant1.locked);

	let payout = Payout {
		participant1_amount,
		participant2_amount,
		participant1_locked,
		participant2_locked,
		total,
	};
	verify_conservation(&payout)?;
	Ok(payout)
}

/// Check that the payout distributes exactly the available deposit.
pub fn verify_conservation(payout: &Payout) -> Result<(), StateTransitionError> {
	let distributed = payout
		.participant1_amount
		.checked_add(payout.participant2_amount)
		.and_then(|sum| sum.checked_add(payout.participant1_locked))
		.and_then(|sum| sum.checked_add(payout.participant2_locked));

	match distributed {
		Some(distributed) if distributed == payout.total => Ok(()),
		Some(distributed) => Err(StateTransitionError::ArithmeticInvariantViolation(format!(
			"distributed {} out of a total of {}",
			distributed, payout.total
		))),
		None => Err(StateTransitionError::ArithmeticInvariantViolation(
			"distributed amount overflows".to_owned(),
		)),
	}
}

/// Settlement over unbounded integers.
pub fn settle_idealized(
	participant1: &SettlementBalance,
	participant2: &SettlementBalance,
) -> IdealizedPayout {
	let p1_deposit = u256_to_integer(participant1.deposit);
	let p1_withdrawn = u256_to_integer(participant1.withdrawn);
	let p1_locked = u256_to_integer(participant1.locked);
	let p1_max_transferred = u256_to_integer(participant1.transferred) + &p1_locked;
	let p2_deposit = u256_to_integer(participant2.deposit);
	let p2_withdrawn = u256_to_integer(participant2.withdrawn);
	let p2_locked = u256_to_integer(participant2.locked);
	let p2_max_transferred = u256_to_integer(participant2.transferred) + &p2_locked;

	let total = Integer::from(&p1_deposit + &p2_deposit) - &p1_withdrawn - &p2_withdrawn;
	let total = total.max(Integer::new());

	let participant1_receivable =
		p1_deposit + p2_max_transferred - p1_max_transferred - p1_withdrawn;
	let participant1_receivable = participant1_receivable.clamp(&Integer::new(), &total);
	let participant2_receivable = (&total - &participant1_receivable).complete();

	let participant1_locked = p1_locked.min(participant2_receivable.clone());
	let participant2_locked = p2_locked.min(participant1_receivable.clone());

	IdealizedPayout {
		participant1_amount: participant1_receivable - &participant2_locked,
		participant2_amount: participant2_receivable - &participant1_locked,
		participant1_locked,
		participant2_locked,
		total,
	}
}
