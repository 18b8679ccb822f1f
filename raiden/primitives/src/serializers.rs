use serde::{
	Serialize,
	Serializer,
};
use web3::types::U256;

use crate::types::{
	ChainID,
	U64,
};

impl Serialize for ChainID {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let value: U256 = (*self).into();
		serializer.serialize_str(&value.to_string())
	}
}

impl Serialize for U64 {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u64(self.low_u64())
	}
}

/// Serialize a token amount as a decimal string.
pub fn u256_to_str<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&value.to_string())
}
