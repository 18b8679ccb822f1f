use std::sync::Arc;

use ethsign::SecretKey;
use parking_lot::RwLock;
use raiden_primitives::{
	config::TokenNetworkConfig,
	hashing::hash_balance_data,
	signing::hash_data,
	types::{
		AdditionalHash,
		Address,
		BlockNumber,
		Bytes,
		CanonicalIdentifier,
		ChainID,
		LockedAmount,
		Locksroot,
		Nonce,
		Signature,
		TokenAmount,
		U256,
	},
};
use raiden_state_machine::{
	machine::channel::utils::{
		balance_proof_message,
		balance_proof_update_message,
	},
	types::{
		BalanceProofState,
		SettlementData,
	},
};
use raiden_storage::StateStorage;
use rusqlite::Connection;

use crate::{
	chain::{
		InMemoryBlockSource,
		InMemorySecretRegistry,
		InMemoryTokenLedger,
		TokenLedger,
	},
	manager::StateManager,
	Transitioner,
};


pub const SETTLE_TIMEOUT: u64 = 500;

/// A channel participant with a deterministic key.
#[derive(Clone, Copy, Debug)]
pub struct Party {
	seed: u8,
}

impl Party {
	pub fn new(seed: u8) -> Self {
		Self { seed }
	}

	fn secret(&self) -> SecretKey {
		SecretKey::from_raw(&[self.seed; 32]).expect("Seed is a valid secret key")
	}

	pub fn address(&self) -> Address {
		Address::from_slice(self.secret().public().address())
	}

	pub fn sign(&self, data: &[u8]) -> Signature {
		let signature = self.secret().sign(&hash_data(data)).expect("Data should be signed");
		let mut bytes = vec![];
		bytes.extend(&signature.r);
		bytes.extend(&signature.s);
		bytes.push(signature.v + 27);
		Bytes(bytes)
	}

	/// A balance proof over the given balance data, with the data it commits to.
	pub fn balance_proof(
		&self,
		canonical_identifier: CanonicalIdentifier,
		transferred_amount: u64,
		locked_amount: u64,
		locksroot: Locksroot,
		nonce: u64,
	) -> (BalanceProofState, SettlementData) {
		let transferred_amount = TokenAmount::from(transferred_amount);
		let locked_amount = LockedAmount::from(locked_amount);
		let mut balance_proof = BalanceProofState {
			balance_hash: hash_balance_data(transferred_amount, locked_amount, locksroot),
			nonce: Nonce::from(nonce),
			additional_hash: AdditionalHash::zero(),
			signature: Bytes(vec![]),
		};
		balance_proof.signature =
			self.sign(&balance_proof_message(canonical_identifier, &balance_proof).pack().0);

		let data = SettlementData {
			address: self.address(),
			transferred_amount,
			locked_amount,
			locksroot,
		};
		(balance_proof, data)
	}

	/// Signature vouching for a balance proof of the partner.
	pub fn counter_sign(
		&self,
		canonical_identifier: CanonicalIdentifier,
		balance_proof: &BalanceProofState,
	) -> Signature {
		self.sign(&balance_proof_update_message(canonical_identifier, balance_proof).pack().0)
	}
}

pub fn alice() -> Party {
	Party::new(1)
}

pub fn bob() -> Party {
	Party::new(2)
}

pub fn executor() -> Party {
	Party::new(3)
}

pub fn config() -> TokenNetworkConfig {
	TokenNetworkConfig::new(
		ChainID::Goerli,
		Address::from_low_u64_be(0x1000),
		Address::from_low_u64_be(0x2000),
		executor().address(),
	)
}

pub struct Harness {
	pub transitioner: Transitioner,
	pub state_manager: Arc<RwLock<StateManager>>,
	pub storage: Arc<StateStorage>,
	pub blocks: Arc<InMemoryBlockSource>,
	pub secrets: Arc<InMemorySecretRegistry>,
}

impl Harness {
	pub fn new(ledger: Arc<dyn TokenLedger>) -> Self {
		let conn = Connection::open_in_memory().expect("In-memory database should open");
		Self::with_connection(conn, ledger)
	}

	pub fn with_connection(conn: Connection, ledger: Arc<dyn TokenLedger>) -> Self {
		let storage = Arc::new(StateStorage::new(conn));
		storage.setup_database().expect("Tables should be created");

		let state_manager = StateManager::restore_or_init_state(
			storage.clone(),
			config(),
			BlockNumber::from(1u64),
		)
		.expect("State should be initialized");
		let state_manager = Arc::new(RwLock::new(state_manager));

		let blocks = Arc::new(InMemoryBlockSource::new(BlockNumber::from(1u64)));
		let secrets = Arc::new(InMemorySecretRegistry::default());
		let transitioner =
			Transitioner::new(state_manager.clone(), blocks.clone(), secrets.clone(), ledger);

		Self { transitioner, state_manager, storage, blocks, secrets }
	}

	pub fn canonical_identifier(&self, channel_identifier: U256) -> CanonicalIdentifier {
		self.transitioner.state().canonical_identifier(channel_identifier)
	}
}

pub fn funded_ledger(balances: &[(Party, u64)]) -> Arc<InMemoryTokenLedger> {
	let ledger = Arc::new(InMemoryTokenLedger::default());
	for (party, amount) in balances {
		ledger.mint(party.address(), TokenAmount::from(*amount)).expect("Mint should succeed");
	}
	ledger
}

/// Both parties' settlement data ordered by address.
pub fn ordered(
	first: SettlementData,
	second: SettlementData,
) -> (SettlementData, SettlementData) {
	if first.address < second.address {
		(first, second)
	} else {
		(second, first)
	}
}
