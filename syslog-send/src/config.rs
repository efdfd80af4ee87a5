//! syslog-send configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use syslog_client::{
    Facility, LoggingConfig, Result, SenderConfig, SerializerKind, Severity, TextEncoding,
    load_config,
};

/// Complete syslog-send configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendConfig {
    /// Collector connection settings.
    #[serde(default)]
    pub sender: SenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Defaults for the messages being sent.
    #[serde(default)]
    pub message: MessageDefaults,
}

/// Header values used when the command line does not set them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDefaults {
    /// "local", "rfc3164" or "rfc5424".
    #[serde(default)]
    pub format: SerializerKind,

    /// Header text encoding; the format's own default when unset.
    #[serde(default)]
    pub encoding: Option<TextEncoding>,

    #[serde(default = "default_facility")]
    pub facility: Facility,

    #[serde(default = "default_severity")]
    pub severity: Severity,

    #[serde(default)]
    pub app_name: Option<String>,

    /// Host name for the header. This machine's name when unset.
    #[serde(default)]
    pub hostname: Option<String>,
}

fn default_facility() -> Facility {
    Facility::User
}

fn default_severity() -> Severity {
    Severity::Notice
}

impl Default for MessageDefaults {
    fn default() -> Self {
        Self {
            format: SerializerKind::default(),
            encoding: None,
            facility: default_facility(),
            severity: default_severity(),
            app_name: None,
            hostname: None,
        }
    }
}

impl SendConfig {
    /// Load and validate configuration from a JSON5 file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.sender.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syslog_client::{Framing, LogFormat, TransportProtocol, parse_config};

    #[test]
    fn test_parse_config() {
        let json5 = r#"
        {
            sender: {
                host: "collector.example.com",
                port: 601,
                protocol: "tcp",
                framing: "non_transparent",
            },
            logging: {
                level: "debug",
                format: "json",
            },
            message: {
                format: "rfc3164",
                encoding: "latin1",
                facility: "local5",
                severity: "err",
                app_name: "backup",
            },
        }
        "#;

        let config: SendConfig = parse_config(json5).unwrap();

        assert_eq!(config.sender.host, "collector.example.com");
        assert_eq!(config.sender.protocol, TransportProtocol::Tcp);
        assert_eq!(config.sender.framing, Framing::NonTransparent);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.message.format, SerializerKind::Rfc3164);
        assert_eq!(config.message.encoding, Some(TextEncoding::Latin1));
        assert_eq!(config.message.facility, Facility::Local5);
        assert_eq!(config.message.severity, Severity::Error);
        assert_eq!(config.message.app_name.as_deref(), Some("backup"));
        assert!(config.message.hostname.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_default_config() {
        let config: SendConfig = parse_config("{}").unwrap();

        assert_eq!(config.sender.port, 514);
        assert_eq!(config.sender.protocol, TransportProtocol::Udp);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.message.format, SerializerKind::Rfc5424);
        assert_eq!(config.message.facility, Facility::User);
        assert_eq!(config.message.severity, Severity::Notice);
    }

    #[test]
    fn test_example_file_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/syslog-send.example.json5");
        let config = SendConfig::load_from_file(path).unwrap();

        assert_eq!(config.sender.host, "localhost");
        assert_eq!(config.message.app_name.as_deref(), Some("syslog-send"));
    }

    #[test]
    fn test_numeric_facility() {
        let config: SendConfig = parse_config(r#"{ message: { facility: "4" } }"#).unwrap();
        assert_eq!(config.message.facility, Facility::Auth);
    }

    #[test]
    fn test_invalid_severity_rejected() {
        let result: Result<SendConfig> = parse_config(r#"{ message: { severity: "loud" } }"#);
        assert!(result.is_err());
    }
}
