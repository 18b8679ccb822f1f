
use ethsign::SecretKey;

use crate::{
	signing::hash_data,
	types::{
		Address,
		Bytes,
	},
};

pub fn secret_key(seed: &str) -> SecretKey {
	let mut secret: [u8; 32] = [0; 32];
	secret[..seed.len()].copy_from_slice(seed.as_bytes());
	SecretKey::from_raw(&secret).expect("Private key generation should not fail")
}

pub fn address_of(key: &SecretKey) -> Address {
	Address::from_slice(key.public().address())
}

pub fn sign(key: &SecretKey, data: &[u8]) -> Bytes {
	let signature = key.sign(&hash_data(data)).expect("Data should be signed");
	let mut bytes = vec![];
	bytes.extend(&signature.r);
	bytes.extend(&signature.s);
	bytes.push(signature.v + 27);
	Bytes(bytes)
}
