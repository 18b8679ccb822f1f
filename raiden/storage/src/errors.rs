use derive_more::Display;
use ulid::DecodeError;

/// Result of storage operation.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error type.
#[derive(Display, Debug)]
pub enum StorageError {
	#[display(fmt = "Storage lock poisoned")]
	CannotLock,
	#[display(fmt = "Cannot serialize for storage {}", _0)]
	SerializationError(serde_json::Error),
	#[display(fmt = "SQL Error: {}", _0)]
	Sql(rusqlite::Error),
	#[display(fmt = "Cannot convert value to Ulid: {}", _0)]
	ID(DecodeError),
	#[display(fmt = "Identifier space exhausted")]
	IdentifierOverflow,
}

impl std::error::Error for StorageError {}
