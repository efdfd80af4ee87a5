use crate::encoding::TextEncoding;
use crate::format::ensure_max_length;
use crate::message::SyslogMessage;

use super::MessageSerializer;

/// Maximum TAG length before the trailing colon.
const TAG_MAX_LEN: usize = 32;

/// RFC 3164 serializer: `<PRI>MMM DD HH:MM:SS HOSTNAME TAG:MSG`.
///
/// The day of month is space-padded (`Jan  5`), as the RFC requires. The TAG
/// is omitted entirely when the app name is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rfc3164Serializer {
    encoding: TextEncoding,
}

impl Rfc3164Serializer {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }
}

impl Default for Rfc3164Serializer {
    fn default() -> Self {
        Self::new(TextEncoding::Ascii)
    }
}

impl MessageSerializer for Rfc3164Serializer {
    fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn serialize_into(&self, message: &SyslogMessage, out: &mut Vec<u8>) {
        let mut line = format!("<{}>", message.priority());
        if let Some(ts) = message.timestamp() {
            // %e pads single-digit days with a space.
            line.push_str(&ts.format("%b %e %H:%M:%S").to_string());
        }
        line.push(' ');
        line.push_str(message.host_name().unwrap_or_default());
        line.push(' ');
        if let Some(app) = message.app_name()
            && !app.trim().is_empty()
        {
            line.push_str(ensure_max_length(app, TAG_MAX_LEN));
            line.push(':');
        }
        line.push_str(message.message().unwrap_or_default());

        self.encoding.encode_into(&line, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Facility, Severity};
    use chrono::{FixedOffset, TimeZone};

    fn ts(day: u32) -> chrono::DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, day, 14, 30, 0)
            .unwrap()
    }

    fn render(msg: &SyslogMessage) -> String {
        String::from_utf8(Rfc3164Serializer::default().serialize(msg)).unwrap()
    }

    #[test]
    fn test_full_line() {
        let msg = SyslogMessage::rfc3164(
            Some(ts(5)),
            Facility::Auth,
            Severity::Critical,
            "myhost",
            Some("sshd"),
            Some("Connection from 10.0.0.1"),
        );
        assert_eq!(render(&msg), "<34>Jan  5 14:30:00 myhost sshd:Connection from 10.0.0.1");
    }

    #[test]
    fn test_two_digit_day_not_padded() {
        let msg = SyslogMessage::rfc3164(
            Some(ts(15)),
            Facility::User,
            Severity::Notice,
            "h",
            Some("app"),
            Some("m"),
        );
        assert_eq!(render(&msg), "<13>Jan 15 14:30:00 h app:m");
    }

    #[test]
    fn test_app_name_truncated_to_32() {
        let app = "a".repeat(40);
        let msg = SyslogMessage::rfc3164(
            None,
            Facility::User,
            Severity::Notice,
            "h",
            Some(app),
            Some("m"),
        );
        let expected = format!("<13> h {}:m", "a".repeat(32));
        assert_eq!(render(&msg), expected);
    }

    #[test]
    fn test_blank_app_name_omits_tag() {
        let msg = SyslogMessage::rfc3164(
            None,
            Facility::Kern,
            Severity::Emergency,
            "h",
            Some("  "),
            Some("boom"),
        );
        assert_eq!(render(&msg), "<0> h boom");
    }

    #[test]
    fn test_missing_body_is_empty() {
        let msg = SyslogMessage::rfc3164(
            Some(ts(1)),
            Facility::Local7,
            Severity::Debug,
            "h",
            Some("app"),
            None::<&str>,
        );
        assert_eq!(render(&msg), "<191>Jan  1 14:30:00 h app:");
    }

    #[test]
    fn test_no_structured_data_emitted() {
        let msg = SyslogMessage::rfc5424(
            None,
            Facility::User,
            Severity::Notice,
            "h",
            Some("app"),
            Some("1"),
            Some("ID"),
            Some("m"),
            vec![crate::StructuredDataElement::new("x", [("k", "v")])],
        );
        assert_eq!(render(&msg), "<13> h app:m");
    }

    #[test]
    fn test_ascii_encoding_replaces() {
        let msg = SyslogMessage::rfc3164(
            None,
            Facility::User,
            Severity::Notice,
            "h",
            Some("app"),
            Some("naïve"),
        );
        assert_eq!(render(&msg), "<13> h app:na?ve");
    }
}
