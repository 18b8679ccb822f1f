use serde::{
	Deserialize,
	Serialize,
};

use super::{
	ChainID,
	ChannelIdentifier,
	TokenNetworkAddress,
};

/// Identifies a channel instance across chains, token networks and reopenings.
///
/// Every signed message commits to all three fields, so a signature can never
/// be replayed against another chain, another token network or a later
/// channel between the same participants.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct CanonicalIdentifier {
	pub chain_identifier: ChainID,
	pub token_network_address: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
}
