use ethsign::SecretKey;
use raiden_primitives::types::{
	SecretHash,
	TokenAmount,
	U256,
};
use rand::{
	thread_rng,
	Rng,
	RngCore,
};

pub struct Generator;

impl Generator {
	pub fn random_key() -> SecretKey {
		let secret_bytes = Self::random_bytes();
		SecretKey::from_raw(&secret_bytes).expect("SecretKey should be generated")
	}

	pub fn random_bytes() -> [u8; 32] {
		let mut secret = [0u8; 32];
		thread_rng().fill_bytes(&mut secret);
		secret
	}

	pub fn random_secrethash() -> SecretHash {
		SecretHash::from(Self::random_bytes())
	}

	/// A random amount below `bound`.
	pub fn random_amount(bound: u128) -> TokenAmount {
		TokenAmount::from(thread_rng().gen_range(0..bound))
	}

	pub fn random_u256() -> U256 {
		U256::from_big_endian(&Self::random_bytes())
	}
}
