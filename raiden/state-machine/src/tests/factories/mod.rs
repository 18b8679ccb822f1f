mod actions;
mod builder;
mod generator;
mod keyring;

pub use actions::*;
pub use builder::*;
use ethsign::SecretKey;
pub use generator::*;
pub use keyring::*;
use raiden_primitives::{
	hashing::hash_balance_data,
	signing::hash_data,
	types::{
		AdditionalHash,
		Address,
		Bytes,
		CanonicalIdentifier,
		LockedAmount,
		Locksroot,
		Nonce,
		Signature,
		TokenAmount,
	},
};

use crate::{
	machine::channel::utils::{
		balance_proof_message,
		balance_proof_update_message,
	},
	types::{
		BalanceProofState,
		SettlementData,
	},
};

pub fn sign_message(secret: SecretKey, message: &[u8]) -> Signature {
	let data_hash = hash_data(message);
	let signature = secret.sign(&data_hash).expect("Data should be signed");
	let mut bytes = vec![];
	bytes.extend(&signature.r);
	bytes.extend(&signature.s);
	bytes.push(signature.v + 27);
	Bytes(bytes)
}

/// Balance data of a participant, together with the balance proof it signs over it.
#[derive(Clone, Debug)]
pub struct SignedBalance {
	pub settlement_data: SettlementData,
	pub balance_proof: BalanceProofState,
}

pub fn make_balance_proof(
	signer: Keyring,
	canonical_identifier: CanonicalIdentifier,
	transferred_amount: TokenAmount,
	locked_amount: LockedAmount,
	locksroot: Locksroot,
	nonce: u64,
) -> SignedBalance {
	let mut balance_proof = BalanceProofState {
		balance_hash: hash_balance_data(transferred_amount, locked_amount, locksroot),
		nonce: Nonce::from(nonce),
		additional_hash: AdditionalHash::zero(),
		signature: Bytes(vec![]),
	};
	balance_proof.signature =
		signer.sign(&balance_proof_message(canonical_identifier, &balance_proof).pack().0);

	SignedBalance {
		settlement_data: SettlementData {
			address: signer.address(),
			transferred_amount,
			locked_amount,
			locksroot,
		},
		balance_proof,
	}
}

/// The partner's counter-signature over a balance proof.
pub fn counter_sign(
	signer: Keyring,
	canonical_identifier: CanonicalIdentifier,
	balance_proof: &BalanceProofState,
) -> Signature {
	signer.sign(&balance_proof_update_message(canonical_identifier, balance_proof).pack().0)
}

/// Empty balance data of a participant which never transferred.
pub fn empty_settlement_data(address: Address) -> SettlementData {
	SettlementData {
		address,
		transferred_amount: TokenAmount::zero(),
		locked_amount: LockedAmount::zero(),
		locksroot: Locksroot::zero(),
	}
}
