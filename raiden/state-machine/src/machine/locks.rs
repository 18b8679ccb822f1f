//! Merkle tree commitment over the set of pending locks of a participant.
//!
//! Leaves are the keccak hashes of the 96 byte packed locks. Both the leaves
//! and every pair of siblings are ordered before hashing, so the root depends
//! only on the set of locks and never on the order they were supplied in.
use itertools::Itertools;
use raiden_primitives::{
	constants::{
		LOCKSROOT_OF_NO_LOCKS,
		LOCK_ENCODED_LENGTH,
	},
	traits::ToBytes,
	types::{
		BlockNumber,
		Bytes,
		EncodedLock,
		LockedAmount,
		Locksroot,
		SecretHash,
		TokenAmount,
		H256,
		U256,
	},
};
use serde::{
	Deserialize,
	Serialize,
};
use web3::signing::keccak256;

use crate::errors::StateTransitionError;

/// A pending conditional transfer.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct HashTimeLock {
	pub expiration: U256,
	pub amount: TokenAmount,
	pub secrethash: SecretHash,
}

impl HashTimeLock {
	pub fn new(expiration: U256, amount: TokenAmount, secrethash: SecretHash) -> Self {
		Self { expiration, amount, secrethash }
	}

	/// `expiration ‖ amount ‖ secrethash`, 32 bytes each.
	pub fn encode(&self) -> Vec<u8> {
		let mut b = Vec::with_capacity(LOCK_ENCODED_LENGTH);
		b.extend(self.expiration.to_bytes());
		b.extend(self.amount.to_bytes());
		b.extend(self.secrethash.as_bytes());
		b
	}

	/// Decode a single 96 byte packed lock.
	pub fn decode(data: &[u8]) -> Result<Self, StateTransitionError> {
		if data.len() != LOCK_ENCODED_LENGTH {
			return Err(StateTransitionError::InvalidLocksEncoding(data.len()))
		}
		Ok(Self {
			expiration: U256::from_big_endian(&data[0..32]),
			amount: U256::from_big_endian(&data[32..64]),
			secrethash: H256::from_slice(&data[64..96]),
		})
	}

	pub fn leaf(&self) -> H256 {
		H256::from(keccak256(&self.encode()))
	}

	/// A lock is claimed if its secret was registered strictly before it expired.
	pub fn is_claimed(&self, reveal_block: BlockNumber) -> bool {
		let reveal_block: U256 = reveal_block.into();
		!reveal_block.is_zero() && reveal_block < self.expiration
	}
}

/// Outcome of resolving a packed list of locks against the secret registry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LocksResolution {
	pub claimed_amount: TokenAmount,
	pub total_amount: LockedAmount,
	pub locksroot: Locksroot,
}

fn hash_pair(first: &H256, second: &H256) -> H256 {
	let (low, high) = if first <= second { (first, second) } else { (second, first) };
	H256::from(keccak256(&[low.as_bytes(), high.as_bytes()].concat()))
}

/// Root of the tree built over `leaves`, which need not be sorted.
pub fn compute_locksroot(leaves: &[H256]) -> Locksroot {
	if leaves.is_empty() {
		return *LOCKSROOT_OF_NO_LOCKS
	}

	let mut layer: Vec<H256> = leaves.iter().copied().sorted().collect();
	while layer.len() > 1 {
		layer = layer
			.chunks(2)
			.map(|pair| match pair.get(1) {
				Some(second) => hash_pair(&pair[0], second),
				None => pair[0],
			})
			.collect();
	}
	layer[0]
}

/// Build the commitment to `locks`.
///
/// The packed bytes hold the locks ordered by leaf hash, which is the order
/// `resolve` expects them to be re-submitted in, though any order is accepted.
pub fn build(locks: &[HashTimeLock]) -> (Locksroot, EncodedLock) {
	let ordered: Vec<(H256, &HashTimeLock)> =
		locks.iter().map(|lock| (lock.leaf(), lock)).sorted_by_key(|(leaf, _)| *leaf).collect();

	let leaves: Vec<H256> = ordered.iter().map(|(leaf, _)| *leaf).collect();
	let packed: Vec<u8> = ordered.iter().flat_map(|(_, lock)| lock.encode()).collect();

	(compute_locksroot(&leaves), Bytes(packed))
}

/// Decode packed locks.
pub fn decode_locks(packed: &[u8]) -> Result<Vec<HashTimeLock>, StateTransitionError> {
	if packed.len() % LOCK_ENCODED_LENGTH != 0 {
		return Err(StateTransitionError::InvalidLocksEncoding(packed.len()))
	}
	packed.chunks(LOCK_ENCODED_LENGTH).map(HashTimeLock::decode).collect()
}

/// Recompute the root of packed locks and sum their claimed and total amounts.
///
/// `reveal_block` returns the block at which a secret was registered, or zero.
/// Amounts are summed modulo 2^256, the caller caps them against the locked
/// amount recorded at settlement.
pub fn resolve<F>(packed: &[u8], reveal_block: F) -> Result<LocksResolution, StateTransitionError>
where
	F: Fn(&SecretHash) -> BlockNumber,
{
	let locks = decode_locks(packed)?;

	let mut claimed_amount = TokenAmount::zero();
	let mut total_amount = LockedAmount::zero();
	let mut leaves = Vec::with_capacity(locks.len());
	for lock in locks.iter() {
		if lock.is_claimed(reveal_block(&lock.secrethash)) {
			claimed_amount = claimed_amount.overflowing_add(lock.amount).0;
		}
		total_amount = total_amount.overflowing_add(lock.amount).0;
		leaves.push(lock.leaf());
	}

	Ok(LocksResolution { claimed_amount, total_amount, locksroot: compute_locksroot(&leaves) })
}
