use once_cell::sync::Lazy;
use secp256k1::{
	ecdsa::{
		RecoverableSignature,
		RecoveryId,
	},
	All,
	Message,
	Secp256k1,
};
use thiserror::Error;
use web3::signing::keccak256;

use crate::{
	constants::SIGNATURE_LENGTH,
	types::Address,
};

static CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Reasons a signature cannot be attributed to a signer.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum SignatureError {
	#[error("Signature has invalid length `{0}`, expected 65 bytes")]
	InvalidLength(usize),
	#[error("Signature has invalid recovery id `{0}`")]
	InvalidRecoveryId(u8),
	#[error("Signature could not be recovered")]
	RecoveryFailed,
	#[error("Signature recovers to the zero address")]
	ZeroAddress,
}

/// Hash data the way an Ethereum signer would before signing it.
pub fn hash_data(data: &[u8]) -> [u8; 32] {
	let prefix_msg = "\x19Ethereum Signed Message:\n";
	let len_str = data.len().to_string();
	let mut res: Vec<u8> = Vec::new();
	res.append(&mut prefix_msg.as_bytes().to_vec());
	res.append(&mut len_str.as_bytes().to_vec());
	res.append(&mut data.to_vec());

	keccak256(&res)
}

/// Recover the address which signed `data`.
pub fn recover(data: &[u8], signature: &[u8]) -> Result<Address, SignatureError> {
	if signature.len() != SIGNATURE_LENGTH {
		return Err(SignatureError::InvalidLength(signature.len()))
	}

	let v = signature[64];
	let recovery_id = if v >= 27 { v - 27 } else { v };
	let recovery_id = RecoveryId::from_i32(recovery_id as i32)
		.map_err(|_| SignatureError::InvalidRecoveryId(v))?;

	let data_hash = hash_data(data);
	let message = Message::from_slice(&data_hash).map_err(|_| SignatureError::RecoveryFailed)?;
	let signature = RecoverableSignature::from_compact(&signature[..64], recovery_id)
		.map_err(|_| SignatureError::RecoveryFailed)?;
	let public_key = CONTEXT
		.recover_ecdsa(&message, &signature)
		.map_err(|_| SignatureError::RecoveryFailed)?;

	let public_key: [u8; 65] = public_key.serialize_uncompressed();
	let hash = keccak256(&public_key[1..]);
	let address = Address::from_slice(&hash[12..]);

	if address.is_zero() {
		return Err(SignatureError::ZeroAddress)
	}

	Ok(address)
}
