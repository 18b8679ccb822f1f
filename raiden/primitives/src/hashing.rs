use sha2::{
	Digest,
	Sha256,
};
use web3::signing::keccak256;

use crate::{
	constants::LOCKSROOT_OF_NO_LOCKS,
	traits::ToBytes,
	types::{
		Address,
		BalanceHash,
		ChannelIdentifier,
		LockedAmount,
		Locksroot,
		ParticipantsHash,
		SecretHash,
		TokenAmount,
		UnlockIdentifier,
	},
};

/// Hash of a secret as registered in the secret registry.
pub fn hash_secret(secret: &[u8]) -> SecretHash {
	let mut hasher = Sha256::new();
	hasher.update(secret);
	let hash: [u8; 32] = hasher.finalize().into();
	SecretHash::from(hash)
}

/// Commitment to the balance data of a balance proof.
///
/// `keccak(transferred_amount ‖ locked_amount ‖ locksroot)`, each encoded on 32 bytes.
pub fn hash_balance_data(
	transferred_amount: TokenAmount,
	locked_amount: LockedAmount,
	locksroot: Locksroot,
) -> BalanceHash {
	let hash = keccak256(
		&[
			&transferred_amount.to_bytes()[..],
			&locked_amount.to_bytes()[..],
			locksroot.as_bytes(),
		]
		.concat(),
	);
	BalanceHash::from(hash)
}

/// Returns true if the balance data is the one of a participant which never transferred.
pub fn is_empty_balance_data(
	transferred_amount: TokenAmount,
	locked_amount: LockedAmount,
	locksroot: Locksroot,
) -> bool {
	transferred_amount.is_zero() && locked_amount.is_zero() && locksroot == *LOCKSROOT_OF_NO_LOCKS
}

/// Order independent identifier of a pair of participants.
pub fn participants_hash(participant: Address, partner: Address) -> ParticipantsHash {
	let (first, second) =
		if participant < partner { (participant, partner) } else { (partner, participant) };
	ParticipantsHash::from(keccak256(&[first.as_bytes(), second.as_bytes()].concat()))
}

/// Key of the locked amount `locker` left pending towards `receiver` when a channel settled.
pub fn unlock_identifier(
	channel_identifier: ChannelIdentifier,
	locker: Address,
	receiver: Address,
) -> UnlockIdentifier {
	UnlockIdentifier::from(keccak256(
		&[&channel_identifier.to_bytes()[..], locker.as_bytes(), receiver.as_bytes()].concat(),
	))
}
