//! Syslog client library
//!
//! Builds syslog messages, serializes them in one of three wire formats and
//! delivers them over UDP, TCP or TLS:
//!
//! - [`message`] - Message model (`SyslogMessage`, `Facility`, `Severity`)
//! - [`structured_data`] - RFC 5424 structured data elements
//! - [`serializer`] - Local, RFC 3164 and RFC 5424 serializers
//! - [`framing`] - RFC 6587 stream framing
//! - [`transport`] - Connection lifecycle and delivery (`SyslogSender`)
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod config;
pub mod encoding;
pub mod error;
pub mod format;
pub mod framing;
pub mod message;
pub mod serializer;
pub mod structured_data;
pub mod transport;

// Re-export commonly used types at the crate root
pub use config::{LogFormat, LoggingConfig, SenderConfig, load_config, parse_config};
pub use encoding::TextEncoding;
pub use error::{Error, Result};
pub use framing::Framing;
pub use message::{Facility, MessageBuilder, Severity, SyslogMessage, priority_value};
pub use serializer::{
    LocalSerializer, MessageSerializer, Rfc3164Serializer, Rfc5424Serializer, SerializerKind,
};
pub use structured_data::{DEFAULT_PRIVATE_ENTERPRISE_NUMBER, StructuredDataElement};
pub use transport::{
    ByteStream, Capabilities, Connector, DatagramSocket, SenderState, SyslogSender, TokioConnector,
    TransportProtocol,
};

pub use tokio_util::sync::CancellationToken;

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level` when set.
///
/// # Example
///
/// ```ignore
/// use syslog_client::{LogFormat, LoggingConfig, init_tracing};
///
/// let config = LoggingConfig {
///     level: "debug".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Diagnostics go to stderr.
    let result = match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))
}
