use raiden_primitives::types::{
	TokenAmount,
	U256,
};
use rand::{
	thread_rng,
	Rng,
};
use rug::Integer;

use crate::{
	machine::settlement::{
		failsafe_subtract,
		integer_to_u256,
		settle,
		settle_idealized,
		u256_to_integer,
		verify_conservation,
		Payout,
		SettlementBalance,
	},
	tests::factories::Generator,
};

fn balance(deposit: u64, withdrawn: u64, transferred: u64, locked: u64) -> SettlementBalance {
	SettlementBalance::new(
		deposit.into(),
		withdrawn.into(),
		transferred.into(),
		locked.into(),
	)
}

fn assert_conserved(payout: &Payout) {
	assert_eq!(
		payout.participant1_amount +
			payout.participant2_amount +
			payout.participant1_locked +
			payout.participant2_locked,
		payout.total
	);
}

/// Balances of two participants which exchanged transfers off-chain, as
/// they would look with their latest balance proofs.
fn random_valid_balances() -> (SettlementBalance, SettlementBalance) {
	let mut rng = thread_rng();
	let deposit1: u64 = rng.gen_range(0..1_000_000);
	let deposit2: u64 = rng.gen_range(0..1_000_000);
	let base: u64 = rng.gen_range(0..1_000_000_000);

	// Net amount participant1 owes participant2 in [-deposit2, deposit1], locks included.
	let net: i64 = rng.gen_range(-(deposit2 as i64)..=(deposit1 as i64));
	let (max1, max2) =
		if net >= 0 { (base + net as u64, base) } else { (base, base + net.unsigned_abs()) };
	let receivable1 = (deposit1 as i64 - net) as u64;
	let receivable2 = deposit2 + deposit1 - receivable1;

	let withdrawn1 = rng.gen_range(0..=receivable1);
	let withdrawn2 = rng.gen_range(0..=receivable2);
	let locked1 = rng.gen_range(0..=max1.min(receivable2 - withdrawn2));
	let locked2 = rng.gen_range(0..=max2.min(receivable1 - withdrawn1));

	(
		balance(deposit1, withdrawn1, max1 - locked1, locked1),
		balance(deposit2, withdrawn2, max2 - locked2, locked2),
	)
}

#[test]
fn test_failsafe_subtract() {
	assert_eq!(failsafe_subtract(10.into(), 3.into()), (7.into(), 3.into()));
	assert_eq!(failsafe_subtract(3.into(), 10.into()), (0.into(), 3.into()));
	assert_eq!(failsafe_subtract(0.into(), U256::max_value()), (0.into(), 0.into()));
}

#[test]
fn test_integer_conversions() {
	let max = u256_to_integer(U256::max_value());
	assert_eq!(integer_to_u256(&max), Some(U256::max_value()));
	assert_eq!(integer_to_u256(&(max + 1u32)), None);
	assert_eq!(integer_to_u256(&Integer::from(-1)), None);
	assert_eq!(integer_to_u256(&Integer::new()), Some(U256::zero()));
}

#[test]
fn test_settlement_worked_example() {
	// The max transferred amount includes the locked amount, see the settlement
	// decision in DESIGN.md for how 36 and 14 are derived.
	let participant_a = balance(35, 5, 20020, 4);
	let participant_b = balance(40, 10, 20030, 6);

	let expected = Payout {
		participant1_amount: 36.into(),
		participant2_amount: 14.into(),
		participant1_locked: 4.into(),
		participant2_locked: 6.into(),
		total: 60.into(),
	};

	let payout = settle(&participant_a, &participant_b).expect("Settlement should succeed");
	assert_eq!(payout, expected);
	assert_eq!(settle_idealized(&participant_a, &participant_b).to_payout(), Some(expected));
}

#[test]
fn test_settlement_is_symmetric() {
	let participant_a = balance(35, 5, 20020, 4);
	let participant_b = balance(40, 10, 20030, 6);

	let forward = settle(&participant_a, &participant_b).expect("Settlement should succeed");
	let backward = settle(&participant_b, &participant_a).expect("Settlement should succeed");
	assert_eq!(forward.participant1_amount, backward.participant2_amount);
	assert_eq!(forward.participant2_amount, backward.participant1_amount);
	assert_eq!(forward.participant1_locked, backward.participant2_locked);
	assert_eq!(forward.participant2_locked, backward.participant1_locked);
}

#[test]
fn test_settlement_conserves_total() {
	for _ in 0..1000 {
		let participant1 = SettlementBalance::new(
			Generator::random_u256(),
			Generator::random_u256(),
			Generator::random_u256(),
			Generator::random_u256(),
		);
		let participant2 = SettlementBalance::new(
			Generator::random_amount(1 << 64),
			Generator::random_amount(1 << 64),
			Generator::random_u256(),
			Generator::random_amount(1 << 64),
		);

		let payout = settle(&participant1, &participant2).expect("Settlement should succeed");
		assert_conserved(&payout);
		assert!(payout.total <= participant1.deposit.overflowing_add(participant2.deposit).0);
	}
}

#[test]
fn test_settlement_matches_idealized_for_latest_proofs() {
	for _ in 0..1000 {
		let (participant1, participant2) = random_valid_balances();

		let payout = settle(&participant1, &participant2).expect("Settlement should succeed");
		let idealized = settle_idealized(&participant1, &participant2);
		assert_eq!(Some(payout), idealized.to_payout(), "{:?} {:?}", participant1, participant2);
		assert_conserved(&payout);
	}
}

#[test]
fn test_settlement_overflowing_transferred_amounts() {
	let max = U256::max_value();
	let participant1 = SettlementBalance::new(100.into(), 10.into(), max - 5, 10.into());
	let participant2 = SettlementBalance::new(50.into(), 0.into(), max, 20.into());

	let payout = settle(&participant1, &participant2).expect("Settlement should succeed");
	assert_eq!(payout.total, TokenAmount::from(140));
	assert_conserved(&payout);
	assert!(payout.participant1_amount <= payout.total);
	assert!(payout.participant2_amount <= payout.total);

	let participant1 = SettlementBalance::new(max, 0.into(), max, max);
	let participant2 = SettlementBalance::new(max, max, max, max);
	let payout = settle(&participant1, &participant2).expect("Settlement should succeed");
	assert_conserved(&payout);
}

#[test]
fn test_settlement_withdrawn_above_deposit() {
	let participant1 = balance(10, 30, 0, 0);
	let participant2 = balance(10, 0, 0, 0);

	let payout = settle(&participant1, &participant2).expect("Settlement should succeed");
	assert_eq!(payout.total, TokenAmount::zero());
	assert_eq!(payout, Payout::default());
}

#[test]
fn test_stale_proofs_are_not_profitable() {
	let mut rng = thread_rng();
	for _ in 0..1000 {
		let (participant1, participant2) = random_valid_balances();
		let latest = settle(&participant1, &participant2).expect("Settlement should succeed");

		// Participant1 registers an older balance proof of participant2.
		let older_transferred = participant2.transferred.low_u64();
		let older_transferred = rng.gen_range(0..=older_transferred);
		let older_locked = rng.gen_range(0..=participant2.locked.low_u64());
		let stale_participant2 = SettlementBalance {
			transferred: older_transferred.into(),
			locked: older_locked.into(),
			..participant2
		};
		let stale = settle(&participant1, &stale_participant2).expect("Settlement should succeed");
		assert_conserved(&stale);

		let entitlement1 =
			|payout: &Payout| payout.participant1_amount + payout.participant2_locked;
		let entitlement2 =
			|payout: &Payout| payout.participant2_amount + payout.participant1_locked;
		assert!(entitlement1(&stale) <= entitlement1(&latest));
		assert!(entitlement2(&stale) >= entitlement2(&latest));
	}
}

#[test]
fn test_conservation_violation_is_fatal() {
	let payout = Payout {
		participant1_amount: 10.into(),
		participant2_amount: 10.into(),
		participant1_locked: 0.into(),
		participant2_locked: 0.into(),
		total: 15.into(),
	};
	let error = verify_conservation(&payout).expect_err("Conservation should be violated");
	assert_eq!(error.kind(), crate::errors::ErrorKind::Fatal);
	assert_eq!(error.code(), "arithmetic_invariant_violation");
}
