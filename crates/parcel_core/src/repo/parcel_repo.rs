//! Parcel repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD access to the `parcel` table.
//! - Enforce the `registered` guard on address changes and deletes in SQL.
//!
//! # Invariants
//! - Every operation is one guarded statement; a rejected conditional write
//!   is followed by a read-only lookup that classifies the rejection.
//! - `get` on a missing number surfaces SQLite's no-rows error unchanged.

use crate::config::StoreConfig;
use crate::db::{open_db, schema::verify_schema, DbError};
use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus, STATUS_REGISTERED};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by parcel persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage failure, including SQLite's no-rows signal from `get`.
    Db(DbError),
    /// No parcel with this number exists.
    BadParcelId(ParcelNumber),
    /// The parcel exists but its status forbids the requested change.
    NotRegistered {
        number: ParcelNumber,
        status: ParcelStatus,
    },
}

impl RepoError {
    /// Returns whether this is SQLite's "query returned no rows" error.
    pub fn is_no_rows(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
        )
    }

    /// Returns whether a conditional write was rejected for either a missing
    /// number or a non-`registered` status.
    pub fn is_bad_parcel_id_or_status(&self) -> bool {
        matches!(self, Self::BadParcelId(_) | Self::NotRegistered { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::BadParcelId(number) => write!(f, "invalid parcel number: {number}"),
            Self::NotRegistered { number, status } => write!(
                f,
                "parcel {number} has status `{status}`, expected '{STATUS_REGISTERED}'"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::BadParcelId(_) | Self::NotRegistered { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for parcel records.
pub trait ParcelRepository {
    /// Inserts a parcel and returns the number assigned by storage.
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber>;
    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Lists a client's parcels in storage order.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    /// Sets the status regardless of the current one.
    fn set_status(&self, number: ParcelNumber, status: &ParcelStatus) -> RepoResult<()>;
    /// Changes the address of a `registered` parcel.
    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()>;
    /// Removes a `registered` parcel.
    fn delete(&self, number: ParcelNumber) -> RepoResult<()>;
}

/// SQLite-backed parcel store owning its connection.
pub struct SqliteParcelStore {
    conn: Connection,
}

impl SqliteParcelStore {
    /// Opens the configured database file and wraps the verified connection.
    pub fn open(config: &StoreConfig) -> RepoResult<Self> {
        let conn = open_db(config)?;
        Ok(Self { conn })
    }

    /// Wraps an already open connection after checking the `parcel` schema.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        verify_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection. The store is consumed.
    pub fn close(self) -> RepoResult<()> {
        self.conn.close().map_err(|(_, err)| RepoError::from(err))
    }

    fn rejection(&self, number: ParcelNumber) -> RepoResult<RepoError> {
        let status = self
            .conn
            .query_row(
                "SELECT status FROM parcel WHERE number = ?1;",
                [number],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(match status {
            None => RepoError::BadParcelId(number),
            Some(status) => RepoError::NotRegistered {
                number,
                status: ParcelStatus::from(status),
            },
        })
    }
}

impl ParcelRepository for SqliteParcelStore {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        self.conn.execute(
            "INSERT INTO parcel (
                client,
                status,
                address,
                created_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                parcel.client,
                parcel.status.as_str(),
                parcel.address.as_str(),
                parcel.created_at.as_str(),
            ],
        )?;

        let number = self.conn.last_insert_rowid();
        debug!(
            "event=parcel_add module=repo status=ok number={} client={}",
            number, parcel.client
        );
        Ok(number)
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let parcel = self.conn.query_row(
            &format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"),
            [number],
            parse_parcel_row,
        )?;
        Ok(parcel)
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE client = ?1;"))?;
        let parcels = stmt
            .query_map([client], parse_parcel_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parcels)
    }

    fn set_status(&self, number: ParcelNumber, status: &ParcelStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET status = ?1 WHERE number = ?2;",
            params![status.as_str(), number],
        )?;

        if changed == 0 {
            warn!(
                "event=parcel_set_status module=repo status=error error_code=bad_parcel_id number={}",
                number
            );
            return Err(RepoError::BadParcelId(number));
        }

        debug!(
            "event=parcel_set_status module=repo status=ok number={} parcel_status={}",
            number, status
        );
        Ok(())
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2 AND status = ?3;",
            params![address, number, STATUS_REGISTERED],
        )?;

        if changed == 0 {
            let err = self.rejection(number)?;
            warn!(
                "event=parcel_set_address module=repo status=error number={} error={}",
                number, err
            );
            return Err(err);
        }

        debug!(
            "event=parcel_set_address module=repo status=ok number={}",
            number
        );
        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM parcel WHERE number = ?1 AND status = ?2;",
            params![number, STATUS_REGISTERED],
        )?;

        if changed == 0 {
            let err = self.rejection(number)?;
            warn!(
                "event=parcel_delete module=repo status=error number={} error={}",
                number, err
            );
            return Err(err);
        }

        debug!("event=parcel_delete module=repo status=ok number={}", number);
        Ok(())
    }
}

fn parse_parcel_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
    Ok(Parcel {
        number: row.get("number")?,
        client: row.get("client")?,
        status: ParcelStatus::from(row.get::<_, String>("status")?),
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}
