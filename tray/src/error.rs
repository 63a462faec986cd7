//! Error types for watson-tray.
//!
//! External-tool failures are deliberately absent from this taxonomy: a
//! missing or misbehaving watson binary degrades to an empty snapshot at
//! the invoker boundary (see [`crate::watson`]) so the tray stays
//! responsive. The errors here are the ones that genuinely stop the agent.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while running the tray agent.
#[derive(Error, Debug)]
pub enum TrayError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The presentation side of the UI channel has gone away.
    #[error("failed to deliver UI event: channel closed")]
    ChannelClosed,
}

/// A specialized `Result` type for tray operations.
pub type Result<T> = std::result::Result<T, TrayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = TrayError::Config(ConfigError::InvalidValue {
            key: "WATSON_TRAY_POLL_INTERVAL_SECS".to_string(),
            message: "expected positive integer".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "configuration error: invalid value for WATSON_TRAY_POLL_INTERVAL_SECS: expected positive integer"
        );
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: TrayError = io_err.into();
        assert!(matches!(err, TrayError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn channel_closed_display() {
        let err = TrayError::ChannelClosed;
        assert_eq!(err.to_string(), "failed to deliver UI event: channel closed");
    }

    #[test]
    fn error_source_chain() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: TrayError = io_err.into();
        assert!(err.source().is_some());
    }
}
