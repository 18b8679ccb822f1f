use std::collections::HashMap;

use raiden_primitives::types::{
	AdditionalHash,
	Address,
	BalanceHash,
	BlockExpiration,
	BlockNumber,
	Bytes,
	CanonicalIdentifier,
	EncodedLock,
	Nonce,
	SecretHash,
	TokenAmount,
};

use super::{
	counter_sign,
	Keyring,
	SignedBalance,
};
use crate::{
	machine::channel::utils::{
		order_participants,
		withdraw_message,
	},
	types::{
		ActionChannelClose,
		ActionChannelSetTotalWithdraw,
		ActionChannelSettle,
		ActionChannelUnlock,
		ActionChannelUpdateNonClosingBalanceProof,
		BalanceProofState,
		SettlementData,
		TokenTransfer,
	},
};

pub fn empty_balance_proof() -> BalanceProofState {
	BalanceProofState {
		balance_hash: BalanceHash::zero(),
		nonce: Nonce::zero(),
		additional_hash: AdditionalHash::zero(),
		signature: Bytes(vec![]),
	}
}

pub fn withdraw_action(
	canonical_identifier: CanonicalIdentifier,
	participant: Keyring,
	partner: Keyring,
	total_withdraw: u64,
	expiration_block: u64,
) -> ActionChannelSetTotalWithdraw {
	let total_withdraw = TokenAmount::from(total_withdraw);
	let expiration_block = BlockExpiration::from(expiration_block);
	let message = withdraw_message(
		canonical_identifier,
		participant.address(),
		total_withdraw,
		expiration_block,
	)
	.pack();

	ActionChannelSetTotalWithdraw {
		channel_identifier: canonical_identifier.channel_identifier,
		participant: participant.address(),
		total_withdraw,
		expiration_block,
		partner: partner.address(),
		participant_signature: participant.sign(&message.0),
		partner_signature: partner.sign(&message.0),
	}
}

/// `closer` closes with the balance proof it received from `partner`.
pub fn close_action(
	canonical_identifier: CanonicalIdentifier,
	closer: Keyring,
	partner: Keyring,
	balance_proof: BalanceProofState,
) -> ActionChannelClose {
	ActionChannelClose {
		channel_identifier: canonical_identifier.channel_identifier,
		closing_participant: closer.address(),
		non_closing_participant: partner.address(),
		closing_signature: counter_sign(closer, canonical_identifier, &balance_proof),
		balance_proof,
	}
}

/// `non_closer` registers the balance proof it received from `closer`.
pub fn update_action(
	canonical_identifier: CanonicalIdentifier,
	closer: Keyring,
	non_closer: Keyring,
	balance_proof: BalanceProofState,
) -> ActionChannelUpdateNonClosingBalanceProof {
	ActionChannelUpdateNonClosingBalanceProof {
		channel_identifier: canonical_identifier.channel_identifier,
		closing_participant: closer.address(),
		non_closing_participant: non_closer.address(),
		non_closing_signature: counter_sign(non_closer, canonical_identifier, &balance_proof),
		balance_proof,
	}
}

/// Settle with the balance data of both participants, in address order.
pub fn settle_action(
	canonical_identifier: CanonicalIdentifier,
	first: SettlementData,
	second: SettlementData,
) -> ActionChannelSettle {
	let (participant1, participant2) = if first.address < second.address {
		(first, second)
	} else {
		(second, first)
	};
	ActionChannelSettle {
		channel_identifier: canonical_identifier.channel_identifier,
		participant1,
		participant2,
	}
}

pub fn settle_signed(
	canonical_identifier: CanonicalIdentifier,
	first: &SignedBalance,
	second: &SignedBalance,
) -> ActionChannelSettle {
	settle_action(canonical_identifier, first.settlement_data, second.settlement_data)
}

pub fn unlock_action(
	canonical_identifier: CanonicalIdentifier,
	sender: Keyring,
	receiver: Keyring,
	locks: EncodedLock,
	secret_reveals: HashMap<SecretHash, BlockNumber>,
) -> ActionChannelUnlock {
	ActionChannelUnlock {
		channel_identifier: canonical_identifier.channel_identifier,
		receiver: receiver.address(),
		sender: sender.address(),
		locks,
		secret_reveals,
	}
}

/// The participants of a channel as (lower, higher) address.
pub fn ordered_keyrings(first: Keyring, second: Keyring) -> (Keyring, Keyring) {
	let (lower, _) = order_participants(first.address(), second.address());
	if lower == first.address() {
		(first, second)
	} else {
		(second, first)
	}
}

/// Sum of the amounts `address` received in `transfers`.
pub fn received(transfers: &[TokenTransfer], address: Address) -> TokenAmount {
	transfers
		.iter()
		.filter(|transfer| transfer.to == address)
		.fold(TokenAmount::zero(), |sum, transfer| sum + transfer.amount)
}
