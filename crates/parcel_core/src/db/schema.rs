//! `parcel` table definition and verification.
//!
//! The store never creates tables on its own. `provision_schema` exists for
//! provisioning tools and tests; `verify_schema` runs on every open.

use super::{DbError, DbResult};
use rusqlite::Connection;

/// Table holding parcel records.
pub const PARCEL_TABLE: &str = "parcel";

/// Columns the repository reads and writes.
pub const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];

/// DDL for an empty parcel database.
pub const PARCEL_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS parcel (
    number INTEGER PRIMARY KEY AUTOINCREMENT,
    client INTEGER NOT NULL DEFAULT 0,
    status VARCHAR(128) NOT NULL DEFAULT '',
    address VARCHAR(256) NOT NULL DEFAULT '',
    created_at VARCHAR(256) NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS parcel_client ON parcel (client);";

/// Creates the `parcel` table and its client index if missing.
pub fn provision_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(PARCEL_SCHEMA_SQL)?;
    Ok(())
}

/// Checks that `parcel` exists with every column the repository uses.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [PARCEL_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(DbError::MissingRequiredTable(PARCEL_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([PARCEL_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for column in PARCEL_COLUMNS {
        if !present.iter().any(|name| name.eq_ignore_ascii_case(column)) {
            return Err(DbError::MissingRequiredColumn {
                table: PARCEL_TABLE,
                column,
            });
        }
    }

    Ok(())
}
