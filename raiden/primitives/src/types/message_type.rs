use derive_more::Display;
use serde::{
	Deserialize,
	Serialize,
};

/// Tag embedded into every signed payload.
///
/// The tag makes a signature produced for one purpose unusable for another.
#[repr(u8)]
#[derive(Copy, Clone, Display, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MessageTypeId {
	#[display(fmt = "balance_proof")]
	BalanceProof = 1,
	#[display(fmt = "balance_proof_update")]
	BalanceProofUpdate = 2,
	#[display(fmt = "withdraw")]
	Withdraw = 3,
}

impl From<MessageTypeId> for u8 {
	fn from(message_type: MessageTypeId) -> Self {
		message_type as u8
	}
}

impl TryFrom<u8> for MessageTypeId {
	type Error = ();

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(MessageTypeId::BalanceProof),
			2 => Ok(MessageTypeId::BalanceProofUpdate),
			3 => Ok(MessageTypeId::Withdraw),
			_ => Err(()),
		}
	}
}
