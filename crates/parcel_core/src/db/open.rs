//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open an existing database file, or an in-memory database for tests.
//! - Verify liveness and schema before returning a usable connection.
//!
//! # Invariants
//! - `open_db` never creates a missing file.
//! - Returned connections have answered a ping and passed `verify_schema`.

use super::schema::{provision_schema, verify_schema};
use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::time::{Duration, Instant};

/// Opens the configured database file and verifies it.
///
/// # Errors
/// - `DatabaseFileNotFound` when the resolved path does not exist.
/// - `Open` when SQLite cannot open the file.
/// - `VerifyConnection` when the liveness ping fails.
/// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is absent.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    let path = config.resolved_path();
    info!(
        "event=db_open module=db status=start mode=file path={}",
        path.display()
    );

    if !path.exists() {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=db_file_not_found path={}",
            started_at.elapsed().as_millis(),
            path.display()
        );
        return Err(DbError::DatabaseFileNotFound(path.to_path_buf()));
    }

    // No SQLITE_OPEN_CREATE: provisioning happens outside this crate.
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = match Connection::open_with_flags(path, flags) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(DbError::Open {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    match bootstrap_connection(&conn, config.busy_timeout_ms) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an in-memory database with the parcel schema provisioned.
///
/// In-memory databases cannot be provisioned externally, so this path creates
/// the table itself. Intended for tests and throwaway tooling.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = Connection::open_in_memory().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        DbError::Open {
            path: ":memory:".into(),
            source: err,
        }
    })?;

    provision_schema(&conn)?;
    bootstrap_connection(&conn, crate::config::DEFAULT_BUSY_TIMEOUT_MS)?;
    info!(
        "event=db_open module=db status=ok mode=memory duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Checks that the connection can read the database header.
///
/// Reading `sqlite_master` forces SQLite to parse the file, so a file that is
/// not a database fails here.
pub fn ping(conn: &Connection) -> DbResult<()> {
    conn.query_row("SELECT COUNT(*) FROM sqlite_master;", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|_| ())
    .map_err(DbError::VerifyConnection)
}

fn bootstrap_connection(conn: &Connection, busy_timeout_ms: u64) -> DbResult<()> {
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    ping(conn)?;
    verify_schema(conn)?;
    Ok(())
}
