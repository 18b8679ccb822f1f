#![warn(clippy::missing_docs_in_private_items)]

//! Sqlite write-ahead log of the token network.
//!
//! Every applied state change is stored in one transaction with the events it
//! produced. Snapshots of the state bound how much of the log has to be replayed
//! on restore.

use std::{
	convert::TryInto,
	sync::Mutex,
};

use chrono::{
	NaiveDateTime,
	Utc,
};
use raiden_state_machine::types::{
	Event,
	StateChange,
	TokenNetworkState,
};
use rusqlite::{
	params,
	Connection,
	Row,
};
use tracing::debug;
use ulid::Ulid;

use crate::{
	errors::{
		Result,
		StorageError,
	},
	types::{
		EventRecord,
		SnapshotRecord,
		StateChangeRecord,
		StorageID,
	},
};

pub mod errors;
/// Sqlite constants.
mod sqlite;
pub mod types;

/// The number of state changes between two snapshots of the state.
pub const SNAPSHOT_STATE_CHANGE_COUNT: u16 = 500;

/// Mutable part of the storage, guarded together.
struct Inner {
	/// The rusqlite connection.
	conn: Connection,
	/// Last identifier handed out, identifiers must sort in insertion order.
	last_identifier: Ulid,
}

impl Inner {
	/// A fresh identifier strictly greater than any previously issued one.
	fn next_identifier(&mut self) -> Result<Ulid> {
		let candidate = Ulid::new();
		let identifier = if candidate > self.last_identifier {
			candidate
		} else {
			let next =
				self.last_identifier.0.checked_add(1).ok_or(StorageError::IdentifierOverflow)?;
			Ulid::from(next)
		};
		self.last_identifier = identifier;
		Ok(identifier)
	}
}

/// Storage interface for the token network state.
pub struct StateStorage {
	/// Connection and identifier generator.
	inner: Mutex<Inner>,
}

impl StateStorage {
	/// Create an instance of `StateStorage`.
	pub fn new(conn: Connection) -> Self {
		Self { inner: Mutex::new(Inner { conn, last_identifier: Ulid::nil() }) }
	}

	/// Create tables if not already created.
	pub fn setup_database(&self) -> Result<()> {
		let setup_db_sql = format!(
			"
			PRAGMA foreign_keys=off;
			BEGIN TRANSACTION;
			{}{}{}
			COMMIT;
			PRAGMA foreign_keys=on;
			",
			sqlite::DB_CREATE_STATE_CHANGES,
			sqlite::DB_CREATE_SNAPSHOT,
			sqlite::DB_CREATE_STATE_EVENTS,
		);
		let mut inner = self.inner.lock().map_err(|_| StorageError::CannotLock)?;
		inner.conn.execute_batch(&setup_db_sql).map_err(StorageError::Sql)?;

		// Continue after the identifiers of an existing database.
		let last: Option<String> = inner
			.conn
			.query_row(
				"SELECT MAX(identifier) FROM (
					SELECT MAX(identifier) AS identifier FROM state_changes
					UNION ALL SELECT MAX(identifier) FROM state_events
					UNION ALL SELECT MAX(identifier) FROM state_snapshot
				)",
				[],
				|row| row.get(0),
			)
			.map_err(StorageError::Sql)?;
		if let Some(last) = last {
			let last: StorageID = last.try_into()?;
			inner.last_identifier = last.inner;
		}

		Ok(())
	}

	/// Store a snapshot of `state` taken after applying `state_change_id`.
	pub fn store_snapshot(
		&self,
		state: &TokenNetworkState,
		state_change_id: Option<StorageID>,
		statechange_qty: u32,
	) -> Result<StorageID> {
		let serialized_state =
			serde_json::to_string(state).map_err(StorageError::SerializationError)?;
		let sql = "
            INSERT OR REPLACE INTO state_snapshot(identifier, statechange_id, statechange_qty, data)
            VALUES(?1, ?2, ?3, ?4)";
		let state_change_id = state_change_id.unwrap_or_else(StorageID::zero);

		let mut inner = self.inner.lock().map_err(|_| StorageError::CannotLock)?;
		let ulid = inner.next_identifier()?;
		inner
			.conn
			.execute(
				sql,
				params![
					&ulid.to_string(),
					state_change_id.to_string(),
					statechange_qty,
					serialized_state
				],
			)
			.map_err(StorageError::Sql)?;

		debug!(
			message = "Stored snapshot",
			state_change = state_change_id.to_string(),
			block_number = state.block_number.to_string()
		);
		Ok(ulid.into())
	}

	/// Store a state change together with the events it produced. Either both are stored or
	/// neither is.
	pub fn store_state_change_with_events(
		&self,
		state_change: &StateChange,
		events: &[Event],
	) -> Result<StorageID> {
		let serialized_state_change =
			serde_json::to_string(state_change).map_err(StorageError::SerializationError)?;
		let serialized_events = events
			.iter()
			.map(serde_json::to_string)
			.collect::<std::result::Result<Vec<_>, _>>()
			.map_err(StorageError::SerializationError)?;

		let mut guard = self.inner.lock().map_err(|_| StorageError::CannotLock)?;
		let inner = &mut *guard;
		let state_change_id = inner.next_identifier()?;
		let mut event_ids = Vec::with_capacity(serialized_events.len());
		for _ in 0..serialized_events.len() {
			event_ids.push(inner.next_identifier()?);
		}

		let tx = inner.conn.transaction().map_err(StorageError::Sql)?;
		tx.execute(
			"INSERT INTO state_changes(identifier, data) VALUES(?1, ?2)",
			params![&state_change_id.to_string(), serialized_state_change],
		)
		.map_err(StorageError::Sql)?;
		let timestamp = Utc::now().naive_utc();
		for (event_id, serialized_event) in event_ids.iter().zip(serialized_events) {
			tx.execute(
				"INSERT INTO state_events(identifier, source_statechange_id, data, timestamp)
				VALUES(?1, ?2, ?3, ?4)",
				params![
					&event_id.to_string(),
					&state_change_id.to_string(),
					serialized_event,
					timestamp
				],
			)
			.map_err(StorageError::Sql)?;
		}
		tx.commit().map_err(StorageError::Sql)?;

		Ok(state_change_id.into())
	}

	/// Return all state changes in the order they were stored.
	pub fn state_changes(&self) -> Result<Vec<StateChangeRecord>> {
		self.get_state_changes_in_range(StorageID::zero(), StorageID::max())
	}

	/// Get the latest snapshot taken at or before a state change.
	pub fn get_snapshot_before_state_change(
		&self,
		state_change_id: StorageID,
	) -> Result<Option<SnapshotRecord>> {
		let sql = "SELECT identifier, statechange_qty, statechange_id, data
			FROM state_snapshot
			WHERE statechange_id <= ?1
			ORDER BY identifier DESC
			LIMIT 1";
		let inner = self.inner.lock().map_err(|_| StorageError::CannotLock)?;
		let mut stmt = inner.conn.prepare(sql).map_err(StorageError::Sql)?;
		let mut rows =
			stmt.query(params![state_change_id.to_string()]).map_err(StorageError::Sql)?;
		let row = match rows.next().map_err(StorageError::Sql)? {
			Some(row) => row,
			None => return Ok(None),
		};

		let identifier: String = row.get(0).map_err(StorageError::Sql)?;
		let state_change_identifier: String = row.get(2).map_err(StorageError::Sql)?;
		let data: String = row.get(3).map_err(StorageError::Sql)?;
		Ok(Some(SnapshotRecord {
			identifier: identifier.try_into()?,
			statechange_qty: row.get(1).map_err(StorageError::Sql)?,
			state_change_identifier: state_change_identifier.try_into()?,
			data: serde_json::from_str(&data).map_err(StorageError::SerializationError)?,
		}))
	}

	/// Get the state changes stored after `after` up to and including `until`.
	pub fn get_state_changes_in_range(
		&self,
		after: StorageID,
		until: StorageID,
	) -> Result<Vec<StateChangeRecord>> {
		let inner = self.inner.lock().map_err(|_| StorageError::CannotLock)?;
		let mut stmt = inner
			.conn
			.prepare(
				"SELECT identifier, data FROM state_changes
                WHERE identifier>?1 AND identifier<=?2
                ORDER BY identifier ASC",
			)
			.map_err(StorageError::Sql)?;

		let after: String = after.into();
		let until: String = until.into();
		let mut rows = stmt.query(params![after, until]).map_err(StorageError::Sql)?;

		let mut state_changes = vec![];
		while let Some(row) = rows.next().map_err(StorageError::Sql)? {
			let identifier: String = row.get(0).map_err(StorageError::Sql)?;
			let data: String = row.get(1).map_err(StorageError::Sql)?;
			state_changes.push(StateChangeRecord {
				identifier: identifier.try_into()?,
				data: serde_json::from_str(&data).map_err(StorageError::SerializationError)?,
			})
		}

		Ok(state_changes)
	}

	/// Return the events produced by a state change.
	pub fn get_events_by_state_change(
		&self,
		state_change_id: StorageID,
	) -> Result<Vec<EventRecord>> {
		let query = "
            SELECT
                identifier, source_statechange_id, data, timestamp
            FROM
                state_events
            WHERE
                source_statechange_id = ?1
            ORDER BY identifier ASC
        ";
		self.query_events(query, state_change_id.to_string())
	}

	/// Return all events of the given type name, oldest first.
	pub fn get_events_by_type(&self, type_name: &str) -> Result<Vec<EventRecord>> {
		let query = "
            SELECT
                identifier, source_statechange_id, data, timestamp
            FROM
                state_events
            WHERE
                json_extract(data, '$.type') = ?1
            ORDER BY identifier ASC
        ";
		self.query_events(query, type_name.to_owned())
	}

	/// Run an event query with a single parameter.
	fn query_events(&self, query: &str, param: String) -> Result<Vec<EventRecord>> {
		let inner = self.inner.lock().map_err(|_| StorageError::CannotLock)?;
		let mut stmt = inner.conn.prepare(query).map_err(StorageError::Sql)?;
		let mut rows = stmt.query(params![param]).map_err(StorageError::Sql)?;

		let mut events = vec![];
		while let Some(row) = rows.next().map_err(StorageError::Sql)? {
			events.push(event_record(row)?);
		}

		Ok(events)
	}
}

/// Map a `state_events` row into an `EventRecord`.
fn event_record(row: &Row) -> Result<EventRecord> {
	let identifier: StorageID =
		row.get::<usize, String>(0).map_err(StorageError::Sql)?.try_into()?;
	let state_change_identifier: StorageID =
		row.get::<usize, String>(1).map_err(StorageError::Sql)?.try_into()?;
	let data: String = row.get(2).map_err(StorageError::Sql)?;
	let timestamp: NaiveDateTime = row.get(3).map_err(StorageError::Sql)?;

	Ok(EventRecord {
		identifier,
		state_change_identifier,
		data: serde_json::from_str(&data).map_err(StorageError::SerializationError)?,
		timestamp,
	})
}
