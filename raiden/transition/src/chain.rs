//! Collaborators the token network is applied against.
use std::collections::HashMap;

use parking_lot::RwLock;
use raiden_primitives::{
	hashing::hash_secret,
	traits::Checksum,
	types::{
		Address,
		BlockNumber,
		SecretHash,
		TokenAmount,
	},
};
use thiserror::Error;

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum LedgerError {
	#[error("{} holds {balance}, cannot transfer {amount}", .address.checksum())]
	InsufficientBalance { address: Address, balance: TokenAmount, amount: TokenAmount },
	#[error("Balance of {} overflows", .0.checksum())]
	BalanceOverflow(Address),
	#[error("Transfer rejected: {0}")]
	Rejected(String),
}

/// Source of the current block height.
pub trait BlockSource: Send + Sync {
	fn current_block(&self) -> BlockNumber;
}

/// Registry of revealed secrets.
pub trait SecretRegistry: Send + Sync {
	/// Block at which the secret of `secrethash` was revealed, zero if it never was.
	fn reveal_block(&self, secrethash: &SecretHash) -> BlockNumber;
}

/// The token the network holds deposits of.
pub trait TokenLedger: Send + Sync {
	fn balance_of(&self, address: Address) -> TokenAmount;

	fn transfer(&self, from: Address, to: Address, amount: TokenAmount) -> Result<(), LedgerError>;
}

#[derive(Default)]
pub struct InMemoryBlockSource {
	block_number: RwLock<BlockNumber>,
}

impl InMemoryBlockSource {
	pub fn new(block_number: BlockNumber) -> Self {
		Self { block_number: RwLock::new(block_number) }
	}

	/// Advance the chain by `blocks`.
	pub fn mine(&self, blocks: u64) -> BlockNumber {
		let mut block_number = self.block_number.write();
		*block_number = block_number.saturating_add(BlockNumber::from(blocks));
		*block_number
	}
}

impl BlockSource for InMemoryBlockSource {
	fn current_block(&self) -> BlockNumber {
		*self.block_number.read()
	}
}

#[derive(Default)]
pub struct InMemorySecretRegistry {
	reveals: RwLock<HashMap<SecretHash, BlockNumber>>,
}

impl InMemorySecretRegistry {
	/// Record the reveal of `secrethash`. The first reveal wins.
	pub fn register(&self, secrethash: SecretHash, block_number: BlockNumber) {
		self.reveals.write().entry(secrethash).or_insert(block_number);
	}

	/// Reveal `secret` at `block_number`, returning the hash it is registered under.
	pub fn register_secret(&self, secret: &[u8], block_number: BlockNumber) -> SecretHash {
		let secrethash = hash_secret(secret);
		self.register(secrethash, block_number);
		secrethash
	}
}

impl SecretRegistry for InMemorySecretRegistry {
	fn reveal_block(&self, secrethash: &SecretHash) -> BlockNumber {
		self.reveals.read().get(secrethash).copied().unwrap_or_default()
	}
}

#[derive(Default)]
pub struct InMemoryTokenLedger {
	balances: RwLock<HashMap<Address, TokenAmount>>,
}

impl InMemoryTokenLedger {
	pub fn mint(&self, address: Address, amount: TokenAmount) -> Result<(), LedgerError> {
		let mut balances = self.balances.write();
		let balance = balances.entry(address).or_default();
		*balance = balance.checked_add(amount).ok_or(LedgerError::BalanceOverflow(address))?;
		Ok(())
	}

	pub fn total_supply(&self) -> TokenAmount {
		self.balances
			.read()
			.values()
			.fold(TokenAmount::zero(), |total, balance| total.saturating_add(*balance))
	}
}

impl TokenLedger for InMemoryTokenLedger {
	fn balance_of(&self, address: Address) -> TokenAmount {
		self.balances.read().get(&address).copied().unwrap_or_default()
	}

	fn transfer(&self, from: Address, to: Address, amount: TokenAmount) -> Result<(), LedgerError> {
		let mut balances = self.balances.write();
		let balance = balances.get(&from).copied().unwrap_or_default();
		if balance < amount {
			return Err(LedgerError::InsufficientBalance { address: from, balance, amount })
		}
		if from == to {
			return Ok(())
		}
		let credited = balances
			.get(&to)
			.copied()
			.unwrap_or_default()
			.checked_add(amount)
			.ok_or(LedgerError::BalanceOverflow(to))?;
		balances.insert(from, balance - amount);
		balances.insert(to, credited);
		Ok(())
	}
}
