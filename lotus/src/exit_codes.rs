//! Stable exit codes for lotus CLI commands.

/// Command succeeded, or the server shut down cleanly.
pub const OK: i32 = 0;
/// Command failed due to invalid config, tool schemas, or I/O errors.
pub const INVALID: i32 = 1;
