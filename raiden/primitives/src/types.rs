pub use web3::types::{
	Address,
	Bytes,
	H160,
	H256,
	U256,
};

mod canonical;
mod chain_id;
mod message_type;
mod numeric;

pub use canonical::*;
pub use chain_id::*;
pub use message_type::*;
pub use numeric::*;

pub type AdditionalHash = H256;

pub type BalanceHash = H256;

pub type BlockExpiration = U64;

pub type BlockNumber = U64;

pub type ChannelIdentifier = U256;

pub type EncodedLock = Bytes;

pub type LockedAmount = U256;

pub type Locksroot = H256;

pub type MessageHash = H256;

pub type Nonce = U64;

pub type ParticipantsHash = H256;

pub type SecretHash = H256;

pub type SettleTimeout = U64;

pub type Signature = Bytes;

pub type TokenAddress = Address;

pub type TokenAmount = U256;

pub type TokenNetworkAddress = Address;

pub type UnlockIdentifier = H256;
