//! Defaults for `LOG_LEVEL`, `LOG_MODE` and `LOG_FILE_PATH`.

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `stdout` or `file`.
pub const DEFAULT_LOG_MODE: &str = "stdout";

/// Base name; the UTC date is appended when the file is opened.
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/stellar-txkit.log";
