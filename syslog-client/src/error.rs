//! Error types for message construction and delivery.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or sending syslog messages.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was missing or empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Incompatible combination of transport options.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The connection could not be established or a write failed.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The operation was abandoned because cancellation was requested.
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a transport error without an underlying cause.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            source: None,
        }
    }

    /// Wrap an I/O failure as a transport error.
    pub fn transport_io(msg: impl Into<String>, source: std::io::Error) -> Self {
        Self::Transport {
            message: format!("{}: {}", msg.into(), source),
            source: Some(source),
        }
    }

    /// Error returned when a send is attempted without a live connection.
    pub fn not_connected() -> Self {
        Self::transport("No transport stream exists")
    }

    /// Whether this error reports a caller-requested cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether this error reports a transport fault.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<json5::Error> for Error {
    fn from(err: json5::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_connected_message() {
        let err = Error::not_connected();
        assert!(err.is_transport());
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "Transport error: No transport stream exists");
    }

    #[test]
    fn test_transport_io_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::transport_io("Failed to connect to 127.0.0.1:514", io);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_cancelled_is_distinct() {
        let err = Error::Cancelled;
        assert!(err.is_cancelled());
        assert!(!err.is_transport());
    }
}
