//! Wire-format serializers.
//!
//! - [`LocalSerializer`]: message body only, for local (no-network) delivery
//! - [`Rfc3164Serializer`]: legacy BSD syslog
//! - [`Rfc5424Serializer`]: structured, versioned syslog
//!
//! Serializers are stateless and cheap to construct. Build one directly or
//! through [`SerializerKind::build`].

mod local;
mod rfc3164;
mod rfc5424;

pub use local::LocalSerializer;
pub use rfc3164::Rfc3164Serializer;
pub use rfc5424::Rfc5424Serializer;

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::message::SyslogMessage;

/// Turns a [`SyslogMessage`] into bytes.
pub trait MessageSerializer: Send + Sync {
    /// Encoding used for text the format does not pin to UTF-8.
    fn encoding(&self) -> TextEncoding;

    /// Append the serialized message to `out`.
    fn serialize_into(&self, message: &SyslogMessage, out: &mut Vec<u8>);

    /// Serialize the message into a new buffer.
    fn serialize(&self, message: &SyslogMessage) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);
        self.serialize_into(message, &mut out);
        out
    }
}

/// Selects a wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializerKind {
    Local,
    Rfc3164,
    #[default]
    Rfc5424,
}

impl SerializerKind {
    /// Build a serializer using the format's default encoding.
    pub fn build_default(self) -> Box<dyn MessageSerializer> {
        match self {
            Self::Local => Box::new(LocalSerializer::default()),
            Self::Rfc3164 => Box::new(Rfc3164Serializer::default()),
            Self::Rfc5424 => Box::new(Rfc5424Serializer::default()),
        }
    }

    /// Build a serializer with an explicit encoding.
    pub fn build(self, encoding: TextEncoding) -> Box<dyn MessageSerializer> {
        match self {
            Self::Local => Box::new(LocalSerializer::new(encoding)),
            Self::Rfc3164 => Box::new(Rfc3164Serializer::new(encoding)),
            Self::Rfc5424 => Box::new(Rfc5424Serializer::new(encoding)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Rfc3164 => "rfc3164",
            Self::Rfc5424 => "rfc5424",
        }
    }
}

impl std::fmt::Display for SerializerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SerializerKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "rfc3164" | "bsd" => Ok(Self::Rfc3164),
            "rfc5424" => Ok(Self::Rfc5424),
            other => Err(crate::Error::invalid_argument(format!(
                "unknown message format: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Facility, Severity};

    #[test]
    fn test_factory_defaults() {
        assert_eq!(SerializerKind::Local.build_default().encoding(), TextEncoding::Utf8);
        assert_eq!(SerializerKind::Rfc3164.build_default().encoding(), TextEncoding::Ascii);
        assert_eq!(SerializerKind::Rfc5424.build_default().encoding(), TextEncoding::Ascii);
        assert_eq!(
            SerializerKind::Rfc3164.build(TextEncoding::Utf8).encoding(),
            TextEncoding::Utf8
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("RFC5424".parse::<SerializerKind>().unwrap(), SerializerKind::Rfc5424);
        assert_eq!("bsd".parse::<SerializerKind>().unwrap(), SerializerKind::Rfc3164);
        assert!("gelf".parse::<SerializerKind>().is_err());
    }

    #[test]
    fn test_serialize_appends() {
        let serializer = SerializerKind::Local.build_default();
        let msg = SyslogMessage::local(Facility::User, Severity::Notice, None::<&str>, Some("two"));
        let mut out = b"one ".to_vec();
        serializer.serialize_into(&msg, &mut out);
        assert_eq!(out, b"one two");
    }
}
