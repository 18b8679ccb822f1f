use std::{
	ops::{
		Add,
		Sub,
	},
	str::FromStr,
};

use derive_more::Display;
use web3::types::{
	U256,
	U64 as PrimitiveU64,
};

/// A wrapper around web3's U64 type used for block numbers, timeouts and nonces.
#[derive(
	Default, Copy, Clone, Display, Debug, derive_more::Deref, Eq, Ord, PartialEq, PartialOrd, Hash,
)]
pub struct U64(PrimitiveU64);

impl U64 {
	/// Return zero value.
	pub fn zero() -> Self {
		Self(PrimitiveU64::zero())
	}

	/// Return the largest representable value.
	pub fn max_value() -> Self {
		Self(PrimitiveU64::max_value())
	}

	/// Convert to the 32 byte, left padded, big endian representation used in signed payloads.
	pub fn to_be_bytes(&self) -> Vec<u8> {
		let mut padded_bytes: [u8; 32] = [0; 32];
		padded_bytes[24..].copy_from_slice(&self.0.low_u64().to_be_bytes());
		padded_bytes.to_vec()
	}

	/// Addition that returns `None` on overflow.
	pub fn checked_add(self, rhs: U64) -> Option<U64> {
		self.0.checked_add(rhs.0).map(Self)
	}

	/// Addition clamped to `U64::max_value()`.
	pub fn saturating_add(self, rhs: U64) -> U64 {
		Self(self.0.saturating_add(rhs.0))
	}
}

impl From<PrimitiveU64> for U64 {
	fn from(n: PrimitiveU64) -> Self {
		Self(n)
	}
}

impl From<U64> for PrimitiveU64 {
	fn from(n: U64) -> Self {
		n.0
	}
}

impl FromStr for U64 {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if let Ok(num) = PrimitiveU64::from_dec_str(s) {
			return Ok(U64(num))
		}
		let num = PrimitiveU64::from_str(s).map_err(|_| ())?;
		Ok(U64(num))
	}
}

impl Add<U64> for U64 {
	type Output = U64;

	fn add(self, rhs: U64) -> Self::Output {
		U64::from(self.0 + rhs.0)
	}
}

impl Sub<U64> for U64 {
	type Output = U64;

	fn sub(self, rhs: U64) -> Self::Output {
		U64::from(self.0 - rhs.0)
	}
}

impl From<U64> for U256 {
	fn from(num: U64) -> Self {
		num.0.low_u64().into()
	}
}

impl From<U64> for u64 {
	fn from(num: U64) -> Self {
		num.0.low_u64()
	}
}

impl From<u64> for U64 {
	fn from(n: u64) -> Self {
		Self(n.into())
	}
}

impl From<u32> for U64 {
	fn from(n: u32) -> Self {
		Self((n as u64).into())
	}
}
