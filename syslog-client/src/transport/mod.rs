//! Connection lifecycle and message delivery.
//!
//! One [`SyslogSender`] state machine serves every medium. Behaviour that
//! differs between UDP, TCP and TLS is selected by the [`Capabilities`] of the
//! configured [`TransportProtocol`].

mod connector;
mod sender;

pub use connector::{ByteStream, Connector, DatagramSocket, TokioConnector};
pub use sender::SyslogSender;

use serde::{Deserialize, Serialize};

/// Delivery medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    #[default]
    Udp,
    Tcp,
    /// TCP with an encrypted channel negotiated by the connector.
    Tls,
}

impl TransportProtocol {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Self::Udp => Capabilities {
                can_frame: false,
                supports_secure: false,
                connectionless: true,
            },
            Self::Tcp => Capabilities {
                can_frame: true,
                supports_secure: false,
                connectionless: false,
            },
            Self::Tls => Capabilities {
                can_frame: true,
                supports_secure: true,
                connectionless: false,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
            Self::Tls => "tls",
        }
    }
}

impl std::fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportProtocol {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udp" => Ok(Self::Udp),
            "tcp" => Ok(Self::Tcp),
            "tls" => Ok(Self::Tls),
            other => Err(crate::Error::invalid_argument(format!(
                "unknown transport protocol: {}",
                other
            ))),
        }
    }
}

/// What a transport can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Messages are framed on a byte stream.
    pub can_frame: bool,
    /// The connection is encrypted.
    pub supports_secure: bool,
    /// No connection is held; each message is an independent datagram.
    pub connectionless: bool,
}

/// Sender lifecycle state. Only `Connected` allows sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SenderState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl std::fmt::Display for SenderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        let udp = TransportProtocol::Udp.capabilities();
        assert!(udp.connectionless && !udp.can_frame && !udp.supports_secure);

        let tcp = TransportProtocol::Tcp.capabilities();
        assert!(!tcp.connectionless && tcp.can_frame && !tcp.supports_secure);

        let tls = TransportProtocol::Tls.capabilities();
        assert!(!tls.connectionless && tls.can_frame && tls.supports_secure);
    }

    #[test]
    fn test_protocol_serde() {
        let protocol: TransportProtocol = json5::from_str("\"tls\"").unwrap();
        assert_eq!(protocol, TransportProtocol::Tls);
        assert_eq!(TransportProtocol::default(), TransportProtocol::Udp);
    }

    #[test]
    fn test_protocol_from_str() {
        assert_eq!("TCP".parse::<TransportProtocol>().unwrap(), TransportProtocol::Tcp);
        assert!("sctp".parse::<TransportProtocol>().is_err());
    }
}
