//! Syslog message model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::structured_data::StructuredDataElement;

/// Syslog facility codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum Facility {
    Kern = 0,
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    Authpriv = 10,
    Ftp = 11,
    Ntp = 12,
    Audit = 13,
    Alert = 14,
    Clock = 15,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

impl Facility {
    /// All facilities in code order.
    pub const ALL: [Facility; 24] = [
        Self::Kern,
        Self::User,
        Self::Mail,
        Self::Daemon,
        Self::Auth,
        Self::Syslog,
        Self::Lpr,
        Self::News,
        Self::Uucp,
        Self::Cron,
        Self::Authpriv,
        Self::Ftp,
        Self::Ntp,
        Self::Audit,
        Self::Alert,
        Self::Clock,
        Self::Local0,
        Self::Local1,
        Self::Local2,
        Self::Local3,
        Self::Local4,
        Self::Local5,
        Self::Local6,
        Self::Local7,
    ];

    /// Parse facility from numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Numeric code used in the priority value.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get the string name of the facility.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::Authpriv => "authpriv",
            Self::Ftp => "ftp",
            Self::Ntp => "ntp",
            Self::Audit => "audit",
            Self::Alert => "alert",
            Self::Clock => "clock",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facility {
    type Err = Error;

    /// Accepts the short name (`local0`), `security`/`auth` aliases, or the numeric code.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        if let Ok(code) = name.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| {
                Error::invalid_argument(format!("facility code out of range: {}", s))
            });
        }
        let alias = match name.as_str() {
            "kernel" => "kern",
            "security" => "auth",
            "clockd" => "clock",
            other => other,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == alias)
            .ok_or_else(|| Error::invalid_argument(format!("unknown facility: {}", s)))
    }
}

impl TryFrom<String> for Facility {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Facility> for String {
    fn from(value: Facility) -> Self {
        value.as_str().to_string()
    }
}

/// Syslog severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Informational = 6,
    Debug = 7,
}

impl Severity {
    /// All severities in code order.
    pub const ALL: [Severity; 8] = [
        Self::Emergency,
        Self::Alert,
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Notice,
        Self::Informational,
        Self::Debug,
    ];

    /// Parse severity from numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Numeric code used in the priority value.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get the string name of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "emerg",
            Self::Alert => "alert",
            Self::Critical => "crit",
            Self::Error => "err",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Informational => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    /// Accepts the short name (`err`), the long name (`error`), or the numeric code.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        if let Ok(code) = name.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| {
                Error::invalid_argument(format!("severity code out of range: {}", s))
            });
        }
        let severity = match name.as_str() {
            "emerg" | "emergency" | "panic" => Self::Emergency,
            "alert" => Self::Alert,
            "crit" | "critical" => Self::Critical,
            "err" | "error" => Self::Error,
            "warning" | "warn" => Self::Warning,
            "notice" => Self::Notice,
            "info" | "informational" => Self::Informational,
            "debug" => Self::Debug,
            _ => return Err(Error::invalid_argument(format!("unknown severity: {}", s))),
        };
        Ok(severity)
    }
}

impl TryFrom<String> for Severity {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.as_str().to_string()
    }
}

/// Compute the PRI value carried in `<...>` at the start of every header.
pub fn priority_value(facility: Facility, severity: Severity) -> u8 {
    facility.code() * 8 + severity.code()
}

/// One syslog event, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SyslogMessage {
    facility: Facility,
    severity: Severity,
    timestamp: Option<DateTime<FixedOffset>>,
    host_name: Option<String>,
    app_name: Option<String>,
    proc_id: Option<String>,
    msg_id: Option<String>,
    message: Option<String>,
    structured_data: Vec<StructuredDataElement>,
}

impl SyslogMessage {
    /// Protocol version emitted by the RFC 5424 serializer.
    pub const VERSION: u8 = 1;

    /// Message for the local (no-network) serializer.
    pub fn local(
        facility: Facility,
        severity: Severity,
        app_name: Option<impl Into<String>>,
        message: Option<impl Into<String>>,
    ) -> Self {
        Self {
            facility,
            severity,
            timestamp: None,
            host_name: None,
            app_name: app_name.map(Into::into),
            proc_id: None,
            msg_id: None,
            message: message.map(Into::into),
            structured_data: Vec::new(),
        }
    }

    /// Message for the RFC 3164 serializer.
    pub fn rfc3164(
        timestamp: Option<DateTime<FixedOffset>>,
        facility: Facility,
        severity: Severity,
        host_name: impl Into<String>,
        app_name: Option<impl Into<String>>,
        message: Option<impl Into<String>>,
    ) -> Self {
        Self {
            timestamp,
            host_name: Some(host_name.into()),
            ..Self::local(facility, severity, app_name, message)
        }
    }

    /// Full RFC 5424 message.
    #[allow(clippy::too_many_arguments)]
    pub fn rfc5424(
        timestamp: Option<DateTime<FixedOffset>>,
        facility: Facility,
        severity: Severity,
        host_name: impl Into<String>,
        app_name: Option<impl Into<String>>,
        proc_id: Option<impl Into<String>>,
        msg_id: Option<impl Into<String>>,
        message: Option<impl Into<String>>,
        structured_data: Vec<StructuredDataElement>,
    ) -> Self {
        Self {
            proc_id: proc_id.map(Into::into),
            msg_id: msg_id.map(Into::into),
            structured_data,
            ..Self::rfc3164(timestamp, facility, severity, host_name, app_name, message)
        }
    }

    /// Start building a message with optional fields.
    pub fn builder(facility: Facility, severity: Severity) -> MessageBuilder {
        MessageBuilder::new(facility, severity)
    }

    pub fn facility(&self) -> Facility {
        self.facility
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Always [`Self::VERSION`].
    pub fn version(&self) -> u8 {
        Self::VERSION
    }

    /// PRI value: `facility * 8 + severity`.
    pub fn priority(&self) -> u8 {
        priority_value(self.facility, self.severity)
    }

    pub fn timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        self.timestamp.as_ref()
    }

    pub fn host_name(&self) -> Option<&str> {
        self.host_name.as_deref()
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn proc_id(&self) -> Option<&str> {
        self.proc_id.as_deref()
    }

    pub fn msg_id(&self) -> Option<&str> {
        self.msg_id.as_deref()
    }

    /// Free-text body.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn structured_data(&self) -> &[StructuredDataElement] {
        &self.structured_data
    }
}

/// Builder for [`SyslogMessage`] when fields are only known at runtime.
///
/// The host name is required for the RFC 3164 and RFC 5424 variants; the
/// corresponding `build_*` methods reject a builder without one.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: SyslogMessage,
}

impl MessageBuilder {
    pub fn new(facility: Facility, severity: Severity) -> Self {
        Self {
            message: SyslogMessage::local(facility, severity, None::<String>, None::<String>),
        }
    }

    pub fn timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.message.timestamp = Some(timestamp);
        self
    }

    pub fn host_name(mut self, host_name: impl Into<String>) -> Self {
        self.message.host_name = Some(host_name.into());
        self
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.message.app_name = Some(app_name.into());
        self
    }

    pub fn proc_id(mut self, proc_id: impl Into<String>) -> Self {
        self.message.proc_id = Some(proc_id.into());
        self
    }

    pub fn msg_id(mut self, msg_id: impl Into<String>) -> Self {
        self.message.msg_id = Some(msg_id.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message.message = Some(message.into());
        self
    }

    /// Append a structured data element; order is kept on the wire.
    pub fn structured_data(mut self, element: StructuredDataElement) -> Self {
        self.message.structured_data.push(element);
        self
    }

    /// Local message: only facility, severity, app name and body are kept.
    pub fn build_local(self) -> SyslogMessage {
        let m = self.message;
        SyslogMessage::local(m.facility, m.severity, m.app_name, m.message)
    }

    /// RFC 3164 message. Fails without a host name.
    pub fn build_rfc3164(self) -> Result<SyslogMessage> {
        let m = self.message;
        let host_name = m
            .host_name
            .ok_or_else(|| Error::invalid_argument("host_name is required"))?;
        Ok(SyslogMessage::rfc3164(
            m.timestamp,
            m.facility,
            m.severity,
            host_name,
            m.app_name,
            m.message,
        ))
    }

    /// RFC 5424 message. Fails without a host name.
    pub fn build_rfc5424(self) -> Result<SyslogMessage> {
        if self.message.host_name.is_none() {
            return Err(Error::invalid_argument("host_name is required"));
        }
        Ok(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_for_every_pair() {
        for facility in Facility::ALL {
            for severity in Severity::ALL {
                let msg = SyslogMessage::local(facility, severity, None::<&str>, Some("x"));
                assert_eq!(
                    u32::from(msg.priority()),
                    u32::from(facility.code()) * 8 + u32::from(severity.code())
                );
            }
        }
        assert_eq!(priority_value(Facility::Local7, Severity::Debug), 191);
        assert_eq!(priority_value(Facility::Kern, Severity::Emergency), 0);
    }

    #[test]
    fn test_facility_codes_roundtrip() {
        for (code, facility) in Facility::ALL.iter().enumerate() {
            assert_eq!(Facility::from_code(code as u8), Some(*facility));
        }
        assert_eq!(Facility::from_code(24), None);
        assert_eq!(Severity::from_code(8), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("local3".parse::<Facility>().unwrap(), Facility::Local3);
        assert_eq!("AUTH".parse::<Facility>().unwrap(), Facility::Auth);
        assert_eq!("4".parse::<Facility>().unwrap(), Facility::Auth);
        assert!("nope".parse::<Facility>().is_err());
        assert!("30".parse::<Facility>().is_err());

        assert_eq!("err".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("informational".parse::<Severity>().unwrap(), Severity::Informational);
        assert_eq!("7".parse::<Severity>().unwrap(), Severity::Debug);
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_serde_uses_short_names() {
        let facility: Facility = json5::from_str("\"local0\"").unwrap();
        assert_eq!(facility, Facility::Local0);
        let severity: Severity = json5::from_str("\"crit\"").unwrap();
        assert_eq!(severity, Severity::Critical);
        assert_eq!(json5::to_string(&Severity::Notice).unwrap(), "\"notice\"");
    }

    #[test]
    fn test_builder_requires_host_for_rfc5424() {
        let result = SyslogMessage::builder(Facility::User, Severity::Notice)
            .app_name("app")
            .message("hello")
            .build_rfc5424();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let result = SyslogMessage::builder(Facility::User, Severity::Notice).build_rfc3164();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_builder_local_drops_network_fields() {
        let msg = SyslogMessage::builder(Facility::Daemon, Severity::Warning)
            .host_name("host")
            .proc_id("42")
            .app_name("app")
            .message("body")
            .build_local();
        assert_eq!(msg.host_name(), None);
        assert_eq!(msg.proc_id(), None);
        assert_eq!(msg.app_name(), Some("app"));
        assert_eq!(msg.message(), Some("body"));
    }

    #[test]
    fn test_builder_rfc5424_keeps_all_fields() {
        let msg = SyslogMessage::builder(Facility::Local4, Severity::Informational)
            .host_name("mymachine")
            .app_name("su")
            .proc_id("123")
            .msg_id("ID47")
            .message("'su root' failed")
            .structured_data(StructuredDataElement::new("exampleSDID", [("iut", "3")]))
            .build_rfc5424()
            .unwrap();
        assert_eq!(msg.version(), 1);
        assert_eq!(msg.host_name(), Some("mymachine"));
        assert_eq!(msg.msg_id(), Some("ID47"));
        assert_eq!(msg.structured_data().len(), 1);
        assert_eq!(msg.priority(), 166);
    }
}
