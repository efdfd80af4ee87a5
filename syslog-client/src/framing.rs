//! Stream framing (RFC 6587).
//!
//! Framing works on already-serialized bytes and is only applied by stream
//! transports; datagrams are always sent unframed.

use serde::{Deserialize, Serialize};

/// Separates the octet count from the payload.
pub const OCTET_COUNT_DELIMITER: u8 = b' ';

/// Terminates a non-transparent frame.
pub const FRAME_TRAILER: u8 = b'\n';

/// How messages are delimited on a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// `<decimal length><SP><payload>`.
    #[default]
    OctetCounting,
    /// `<payload><LF>`.
    NonTransparent,
}

impl Framing {
    /// Append one framed unit for `payload` to `out`.
    pub fn frame_into(self, payload: &[u8], out: &mut Vec<u8>) {
        match self {
            Self::OctetCounting => {
                out.extend_from_slice(payload.len().to_string().as_bytes());
                out.push(OCTET_COUNT_DELIMITER);
                out.extend_from_slice(payload);
            }
            Self::NonTransparent => {
                out.extend_from_slice(payload);
                out.push(FRAME_TRAILER);
            }
        }
    }

    /// Frame `payload` into a new buffer.
    pub fn frame(self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(payload.len() + 8);
        self.frame_into(payload, &mut out);
        out
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OctetCounting => "octet_counting",
            Self::NonTransparent => "non_transparent",
        }
    }
}

impl std::fmt::Display for Framing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Framing {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "octet_counting" => Ok(Self::OctetCounting),
            "non_transparent" => Ok(Self::NonTransparent),
            other => Err(crate::Error::invalid_argument(format!("unknown framing: {}", other))),
        }
    }
}
