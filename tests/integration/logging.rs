//! File logging setup.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_FILE_PATH: when using file mode, the path of the log file
//!   Refer to `src/logging/mod.rs` for more details.
use chrono::Utc;
use serial_test::serial;
use std::{env, fs, path::Path, thread, time::Duration};
use stellar_txkit::logging::{compute_rolled_file_path, setup_logging, LoggingError};

// Only one global logger can be installed per process, so the whole lifecycle
// is checked in a single test.
#[test]
#[serial]
fn test_setup_logging_file_mode_creates_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("nested").join("txkit.log");

    env::set_var("LOG_MODE", "file");
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("LOG_FILE_PATH", base_path.to_str().unwrap());

    setup_logging().unwrap();
    log::info!("integration log line");
    // Sleep for logger to flush
    thread::sleep(Duration::from_millis(200));

    let expected = compute_rolled_file_path(base_path.to_str().unwrap(), Utc::now().date_naive());
    assert!(
        Path::new(&expected).exists(),
        "Expected log file {expected} does not exist"
    );
    let contents = fs::read_to_string(&expected).unwrap();
    assert!(contents.contains("Logging is successfully configured"));

    // a second logger cannot be installed
    env::set_var("LOG_MODE", "stdout");
    assert!(matches!(setup_logging(), Err(LoggingError::Init(_))));

    env::remove_var("LOG_MODE");
    env::remove_var("LOG_LEVEL");
    env::remove_var("LOG_FILE_PATH");
}
