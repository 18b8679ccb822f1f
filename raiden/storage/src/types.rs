use std::convert::TryFrom;

use chrono::NaiveDateTime;
use raiden_state_machine::types::{
	Event,
	StateChange,
	TokenNetworkState,
};
use ulid::Ulid;

use crate::errors::StorageError;

/// Storage record identifier, ordered by creation.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct StorageID {
	pub(crate) inner: Ulid,
}

impl StorageID {
	pub fn zero() -> Self {
		Self { inner: Ulid::nil() }
	}

	pub fn max() -> Self {
		Self { inner: Ulid::from(u128::MAX) }
	}
}

impl std::fmt::Display for StorageID {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.inner)
	}
}

impl From<u128> for StorageID {
	fn from(id: u128) -> Self {
		Self { inner: Ulid::from(id) }
	}
}

impl From<Ulid> for StorageID {
	fn from(id: Ulid) -> Self {
		Self { inner: id }
	}
}

impl From<StorageID> for String {
	fn from(id: StorageID) -> Self {
		id.inner.to_string()
	}
}

impl TryFrom<String> for StorageID {
	type Error = StorageError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Ok(Self { inner: Ulid::from_string(&value).map_err(StorageError::ID)? })
	}
}

/// A record of a state change.
#[derive(Clone, Debug)]
pub struct StateChangeRecord {
	pub identifier: StorageID,
	pub data: StateChange,
}

/// A record of an event.
#[derive(Clone, Debug)]
pub struct EventRecord {
	pub identifier: StorageID,
	pub state_change_identifier: StorageID,
	pub data: Event,
	pub timestamp: NaiveDateTime,
}

/// A snapshot of the token network state, taken after `state_change_identifier`.
#[derive(Clone, Debug)]
pub struct SnapshotRecord {
	pub identifier: StorageID,
	pub statechange_qty: u32,
	pub state_change_identifier: StorageID,
	pub data: TokenNetworkState,
}
