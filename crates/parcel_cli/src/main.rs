//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `parcel_core` linkage and that a database file opens cleanly.
//! - Exit non-zero with the open error otherwise.
//!
//! Usage: `parcel_cli [DB_PATH]`. Logs go to `$PARCEL_TRACKER_LOG_DIR`, or a
//! `parcel_tracker` directory under the system temp dir.

use parcel_core::{
    default_log_level, init_logging, ParcelRepository, SqliteParcelStore, StoreConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "PARCEL_TRACKER_LOG_DIR";

fn main() -> ExitCode {
    let log_dir = resolve_log_dir(std::env::var(LOG_DIR_ENV).ok());
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("parcel_core logging=error error={err}");
    }

    let config = StoreConfig::new(std::env::args().nth(1).unwrap_or_default());
    println!("parcel_core version={}", parcel_core::core_version());

    let store = match SqliteParcelStore::open(&config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("parcel_core store=error error={err}");
            return ExitCode::FAILURE;
        }
    };

    let path = config.resolved_path().display().to_string();
    match store.get_by_client(0).and_then(|_| store.close()) {
        Ok(()) => {
            println!("parcel_core store=ok path={path}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("parcel_core store=error path={path} error={err}");
            ExitCode::FAILURE
        }
    }
}

/// Picks an absolute log directory; relative or empty overrides are ignored.
fn resolve_log_dir(override_dir: Option<String>) -> PathBuf {
    override_dir
        .map(PathBuf::from)
        .filter(|dir| dir.is_absolute())
        .unwrap_or_else(|| std::env::temp_dir().join("parcel_tracker"))
}

#[cfg(test)]
mod tests {
    use super::resolve_log_dir;
    use std::path::Path;

    #[test]
    fn absolute_override_is_used() {
        assert_eq!(
            resolve_log_dir(Some("/var/log/parcel".to_string())),
            Path::new("/var/log/parcel")
        );
    }

    #[test]
    fn missing_or_relative_override_falls_back_to_temp_dir() {
        for dir in [None, Some(String::new()), Some("logs".to_string())] {
            let resolved = resolve_log_dir(dir);
            assert!(resolved.is_absolute());
            assert!(resolved.ends_with("parcel_tracker"));
        }
    }
}
