#![warn(clippy::missing_docs_in_private_items)]

use raiden_primitives::{
	packing::SignedMessage,
	types::{
		Address,
		BlockExpiration,
		CanonicalIdentifier,
		TokenAmount,
	},
};

use crate::{
	machine::settlement::SettlementBalance,
	types::{
		BalanceProofState,
		ParticipantState,
		SettlementData,
	},
};

/// The balance proof message signed by the participant owning the balance data.
pub fn balance_proof_message(
	canonical_identifier: CanonicalIdentifier,
	balance_proof: &BalanceProofState,
) -> SignedMessage {
	SignedMessage::BalanceProof {
		canonical_identifier,
		balance_hash: balance_proof.balance_hash,
		nonce: balance_proof.nonce,
		additional_hash: balance_proof.additional_hash,
	}
}

/// The message a participant counter-signs to vouch for its partner's balance proof.
pub fn balance_proof_update_message(
	canonical_identifier: CanonicalIdentifier,
	balance_proof: &BalanceProofState,
) -> SignedMessage {
	SignedMessage::BalanceProofUpdate {
		canonical_identifier,
		balance_hash: balance_proof.balance_hash,
		nonce: balance_proof.nonce,
		additional_hash: balance_proof.additional_hash,
		closing_signature: balance_proof.signature.clone(),
	}
}

pub fn withdraw_message(
	canonical_identifier: CanonicalIdentifier,
	participant: Address,
	total_withdraw: TokenAmount,
	expiration_block: BlockExpiration,
) -> SignedMessage {
	SignedMessage::Withdraw { canonical_identifier, participant, total_withdraw, expiration_block }
}

pub fn settlement_balance(
	participant: &ParticipantState,
	settlement_data: &SettlementData,
) -> SettlementBalance {
	SettlementBalance::new(
		participant.deposit,
		participant.withdrawn,
		settlement_data.transferred_amount,
		settlement_data.locked_amount,
	)
}

pub fn order_participants(participant: Address, partner: Address) -> (Address, Address) {
	if participant < partner {
		(participant, partner)
	} else {
		(partner, participant)
	}
}
