use web3::ethabi::{
	encode,
	Token,
};

use crate::{
	signing::{
		hash_data,
		recover,
		SignatureError,
	},
	types::{
		AdditionalHash,
		Address,
		BalanceHash,
		BlockExpiration,
		Bytes,
		CanonicalIdentifier,
		MessageHash,
		MessageTypeId,
		Nonce,
		Signature,
		TokenAmount,
		U256,
	},
};

/// Packs the payload signed by a participant to commit to its balance data.
///
/// `token_network ‖ chain_id ‖ msg_type ‖ channel_id ‖ balance_hash ‖ nonce ‖ additional_hash`
pub fn pack_balance_proof(
	nonce: Nonce,
	balance_hash: BalanceHash,
	additional_hash: AdditionalHash,
	canonical_identifier: CanonicalIdentifier,
	msg_type: MessageTypeId,
) -> Bytes {
	let mut b = vec![];

	b.extend(canonical_identifier.token_network_address.as_bytes());
	b.extend(encode(&[Token::Uint(canonical_identifier.chain_identifier.into())]));
	b.extend(encode(&[Token::Uint(U256::from(u8::from(msg_type)))]));
	b.extend(encode(&[Token::Uint(canonical_identifier.channel_identifier)]));
	b.extend(balance_hash.as_bytes());
	b.extend(encode(&[Token::Uint(nonce.into())]));
	b.extend(additional_hash.as_bytes());

	Bytes(b)
}

/// Packs the payload the non-closing participant signs to register the closer's balance proof.
pub fn pack_balance_proof_update(
	nonce: Nonce,
	balance_hash: BalanceHash,
	additional_hash: AdditionalHash,
	canonical_identifier: CanonicalIdentifier,
	closing_signature: &Signature,
) -> Bytes {
	let mut b = pack_balance_proof(
		nonce,
		balance_hash,
		additional_hash,
		canonical_identifier,
		MessageTypeId::BalanceProofUpdate,
	);

	b.0.extend(&closing_signature.0);

	b
}

/// Packs the payload both participants sign to confirm a new total withdraw.
pub fn pack_withdraw(
	canonical_identifier: CanonicalIdentifier,
	participant: Address,
	total_withdraw: TokenAmount,
	expiration_block: BlockExpiration,
) -> Bytes {
	let mut b = vec![];

	b.extend(canonical_identifier.token_network_address.as_bytes());
	b.extend(encode(&[
		Token::Uint(canonical_identifier.chain_identifier.into()),
		Token::Uint(U256::from(u8::from(MessageTypeId::Withdraw))),
		Token::Uint(canonical_identifier.channel_identifier),
	]));
	b.extend(participant.as_bytes());
	b.extend(encode(&[Token::Uint(total_withdraw), Token::Uint(expiration_block.into())]));

	Bytes(b)
}

/// The closed set of messages participants sign.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignedMessage {
	BalanceProof {
		canonical_identifier: CanonicalIdentifier,
		balance_hash: BalanceHash,
		nonce: Nonce,
		additional_hash: AdditionalHash,
	},
	BalanceProofUpdate {
		canonical_identifier: CanonicalIdentifier,
		balance_hash: BalanceHash,
		nonce: Nonce,
		additional_hash: AdditionalHash,
		closing_signature: Signature,
	},
	Withdraw {
		canonical_identifier: CanonicalIdentifier,
		participant: Address,
		total_withdraw: TokenAmount,
		expiration_block: BlockExpiration,
	},
}

impl SignedMessage {
	/// The type tag embedded into the packed payload.
	pub fn message_type(&self) -> MessageTypeId {
		match self {
			SignedMessage::BalanceProof { .. } => MessageTypeId::BalanceProof,
			SignedMessage::BalanceProofUpdate { .. } => MessageTypeId::BalanceProofUpdate,
			SignedMessage::Withdraw { .. } => MessageTypeId::Withdraw,
		}
	}

	/// Canonical byte encoding of the message.
	pub fn pack(&self) -> Bytes {
		match self {
			SignedMessage::BalanceProof {
				canonical_identifier,
				balance_hash,
				nonce,
				additional_hash,
			} => pack_balance_proof(
				*nonce,
				*balance_hash,
				*additional_hash,
				*canonical_identifier,
				MessageTypeId::BalanceProof,
			),
			SignedMessage::BalanceProofUpdate {
				canonical_identifier,
				balance_hash,
				nonce,
				additional_hash,
				closing_signature,
			} => pack_balance_proof_update(
				*nonce,
				*balance_hash,
				*additional_hash,
				*canonical_identifier,
				closing_signature,
			),
			SignedMessage::Withdraw {
				canonical_identifier,
				participant,
				total_withdraw,
				expiration_block,
			} => pack_withdraw(
				*canonical_identifier,
				*participant,
				*total_withdraw,
				*expiration_block,
			),
		}
	}

	/// The digest which is actually signed.
	pub fn message_hash(&self) -> MessageHash {
		MessageHash::from(hash_data(&self.pack().0))
	}

	/// Recover the address which produced `signature` over this message.
	pub fn recover_signer(&self, signature: &[u8]) -> Result<Address, SignatureError> {
		recover(&self.pack().0, signature)
	}
}
