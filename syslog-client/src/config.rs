use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::framing::Framing;
use crate::transport::TransportProtocol;

/// Standard syslog port.
pub const DEFAULT_PORT: u16 = 514;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where and how messages are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Collector host name or address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Collector port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// "udp", "tcp" or "tls".
    #[serde(default)]
    pub protocol: TransportProtocol,

    /// Stream framing: "octet_counting" or "non_transparent". Ignored for UDP.
    #[serde(default)]
    pub framing: Framing,

    /// Connect timeout in seconds; 0 waits indefinitely.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            protocol: TransportProtocol::default(),
            framing: Framing::default(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl SenderConfig {
    /// Reject values no sender can work with.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::invalid_configuration("sender.host must not be empty"));
        }
        if self.port == 0 {
            return Err(Error::invalid_configuration("sender.port must be non-zero"));
        }
        if self.protocol.capabilities().supports_secure && self.framing == Framing::NonTransparent {
            return Err(Error::invalid_configuration(
                "Non-transparent framing can not be used with TLS transport",
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive, e.g. "debug" or "syslog_client=trace".
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Parse a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}
