/// Big endian, fixed width byte representation used in packed payloads.
pub trait ToBytes {
	fn to_bytes(&self) -> Vec<u8>;
}

/// Checksummed hex representation of an address, used in logs.
pub trait Checksum {
	fn checksum(&self) -> String;
}
