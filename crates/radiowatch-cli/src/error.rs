//! Error types for the Radiowatch CLI.
//!
//! `CliError` wraps `ClientError` from the core library and adds
//! CLI-specific variants. Exit codes 10..12 are reserved for the alerts
//! command's severity result and are not error codes.

use radiowatch_core::error::ClientError;
use thiserror::Error;

use crate::settings::SettingsError;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const ALERT_LOW: i32 = 10;
    pub const ALERT_MEDIUM: i32 = 11;
    pub const ALERT_HIGH: i32 = 12;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_passes_through() {
        let err: CliError = ClientError::Api("Server returned 500: boom".to_string()).into();
        assert_eq!(format!("{}", err), "Server returned 500: boom");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::InvalidArgument("--after expects a timestamp".to_string());
        assert!(format!("{}", err).starts_with("Invalid argument:"));
    }
}
