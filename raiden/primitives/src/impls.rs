use web3::{
	signing::{
		keccak256,
		Signature,
	},
	types::{
		Address,
		U256,
	},
};

use crate::traits::{
	Checksum,
	ToBytes,
};

impl ToBytes for U256 {
	fn to_bytes(&self) -> Vec<u8> {
		let mut bytes = [0u8; 32];
		self.to_big_endian(&mut bytes);
		bytes.to_vec()
	}
}

impl ToBytes for Signature {
	fn to_bytes(&self) -> Vec<u8> {
		let rb = self.r.to_fixed_bytes();
		let sb = self.s.to_fixed_bytes();
		let sv = self.v.to_be_bytes();

		let mut b = vec![];
		b.extend(&rb);
		b.extend(&sb);
		b.push(sv[sv.len() - 1]);
		b
	}
}

impl Checksum for Address {
	fn checksum(&self) -> String {
		let address = hex::encode(self.as_bytes());
		let hash = hex::encode(keccak256(address.as_bytes()));

		let mut checksummed = String::from("0x");
		for (c, h) in address.chars().zip(hash.chars()) {
			if h.to_digit(16).unwrap_or(0) >= 8 {
				checksummed.extend(c.to_uppercase());
			} else {
				checksummed.push(c);
			}
		}
		checksummed
	}
}
