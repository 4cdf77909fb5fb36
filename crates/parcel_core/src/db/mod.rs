//! SQLite connection bootstrap and schema checks.
//!
//! # Responsibility
//! - Open connections to an externally provisioned parcel database.
//! - Verify liveness and the required `parcel` table before use.
//!
//! # Invariants
//! - File-backed opens never create the database file.
//! - Core code must not read/write parcels before verification succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory, ping};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    DatabaseFileNotFound(PathBuf),
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    VerifyConnection(rusqlite::Error),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::DatabaseFileNotFound(path) => {
                write!(f, "database file not found: {}", path.display())
            }
            Self::Open { path, source } => {
                write!(f, "error opening database {}: {source}", path.display())
            }
            Self::VerifyConnection(err) => write!(f, "error verifying connection: {err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` does not exist")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` does not exist")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::VerifyConnection(err) => Some(err),
            Self::Open { source, .. } => Some(source),
            Self::DatabaseFileNotFound(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
