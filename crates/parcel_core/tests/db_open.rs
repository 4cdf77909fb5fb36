use parcel_core::db::schema::provision_schema;
use parcel_core::db::{open_db, ping, DbError};
use parcel_core::{
    Parcel, ParcelRepository, RepoError, SqliteParcelStore, StoreConfig, DEFAULT_DB_FILE_PATH,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

fn provisioned_db(dir: &Path) -> PathBuf {
    let path = dir.join("tracker.db");
    let conn = Connection::open(&path).unwrap();
    provision_schema(&conn).unwrap();
    path
}

#[test]
fn open_existing_provisioned_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = provisioned_db(dir.path());

    let conn = open_db(&StoreConfig::new(&path)).unwrap();
    ping(&conn).unwrap();
}

#[test]
fn missing_file_is_reported_and_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let err = open_db(&StoreConfig::new(&path)).unwrap_err();
    match err {
        DbError::DatabaseFileNotFound(reported) => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!path.exists());
}

#[test]
fn empty_path_resolves_to_default_file() {
    let config = StoreConfig::new("");
    assert_eq!(config.resolved_path(), Path::new(DEFAULT_DB_FILE_PATH));

    if !Path::new(DEFAULT_DB_FILE_PATH).exists() {
        let err = open_db(&config).unwrap_err();
        assert!(matches!(
            err,
            DbError::DatabaseFileNotFound(path) if path == Path::new(DEFAULT_DB_FILE_PATH)
        ));
    }
}

#[test]
fn non_database_file_fails_liveness_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    std::fs::write(&path, "this is not a sqlite database ".repeat(64)).unwrap();

    let err = open_db(&StoreConfig::new(&path)).unwrap_err();
    assert!(matches!(err, DbError::VerifyConnection(_)));
}

#[test]
fn unprovisioned_file_is_missing_parcel_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    std::fs::File::create(&path).unwrap();

    let err = open_db(&StoreConfig::new(&path)).unwrap_err();
    assert!(matches!(err, DbError::MissingRequiredTable("parcel")));
}

#[test]
fn store_open_wraps_startup_errors() {
    let dir = tempfile::tempdir().unwrap();

    let result = SqliteParcelStore::open(&StoreConfig::new(dir.path().join("absent.db")));
    assert!(matches!(
        result,
        Err(RepoError::Db(DbError::DatabaseFileNotFound(_)))
    ));
}

#[test]
fn store_rejects_connection_without_parcel_table() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteParcelStore::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::Db(DbError::MissingRequiredTable("parcel")))
    ));
}

#[test]
fn parcels_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = provisioned_db(dir.path());
    let config = StoreConfig::new(&path);

    let store = SqliteParcelStore::open(&config).unwrap();
    let number = store
        .add(&Parcel::new(3, "Harbor rd 9", "2026-10-16T08:00:00Z"))
        .unwrap();
    store.close().unwrap();

    let reopened = SqliteParcelStore::open(&config).unwrap();
    let parcel = reopened.get(number).unwrap();
    assert_eq!(parcel.client, 3);
    assert_eq!(parcel.address, "Harbor rd 9");
}

#[test]
fn store_config_deserializes_with_defaults() {
    let config: StoreConfig =
        serde_json::from_value(serde_json::json!({ "path": "/srv/tracker.db" })).unwrap();
    assert_eq!(config.path, PathBuf::from("/srv/tracker.db"));
    assert_eq!(config.busy_timeout_ms, 5_000);

    let config: StoreConfig = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(config, StoreConfig::default());
}

#[test]
fn ping_reads_the_file_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    std::fs::write(&path, "not sqlite either ".repeat(64)).unwrap();
    let conn = Connection::open(&path).unwrap();

    assert!(matches!(ping(&conn), Err(DbError::VerifyConnection(_))));
}

#[test]
fn configured_busy_timeout_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = provisioned_db(dir.path());
    let config = StoreConfig {
        busy_timeout_ms: 1_250,
        ..StoreConfig::new(&path)
    };

    let conn = open_db(&config).unwrap();
    let timeout: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 1_250);
}
