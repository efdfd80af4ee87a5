use crate::encoding::TextEncoding;
use crate::format::{
    NIL_VALUE, escape_param_value, format_ascii_field, format_field, format_sd_name_field,
};
use crate::message::SyslogMessage;

use super::MessageSerializer;

const HOSTNAME_MAX_LEN: usize = 255;
const APP_NAME_MAX_LEN: usize = 48;
const PROC_ID_MAX_LEN: usize = 128;
const MSG_ID_MAX_LEN: usize = 32;

/// UTF-8 byte-order mark that precedes MSG.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Six fractional digits: RFC 5424 allows no more than microseconds.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// RFC 5424 serializer:
/// `<PRI>1 TIMESTAMP HOSTNAME APP-NAME PROCID MSGID [SD...] BOM MSG`.
///
/// Header fields and structured data use the configured encoding; the
/// message body is always UTF-8 behind a BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rfc5424Serializer {
    encoding: TextEncoding,
}

impl Rfc5424Serializer {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }
}

impl Default for Rfc5424Serializer {
    fn default() -> Self {
        Self::new(TextEncoding::Ascii)
    }
}

impl MessageSerializer for Rfc5424Serializer {
    fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn serialize_into(&self, message: &SyslogMessage, out: &mut Vec<u8>) {
        let timestamp = message
            .timestamp()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string());

        let mut header = format!("<{}>{}", message.priority(), message.version());
        header.push(' ');
        header.push_str(format_field(timestamp.as_deref(), NIL_VALUE, None));
        header.push(' ');
        header.push_str(&format_ascii_field(message.host_name(), NIL_VALUE, HOSTNAME_MAX_LEN, &[]));
        header.push(' ');
        header.push_str(&format_ascii_field(message.app_name(), NIL_VALUE, APP_NAME_MAX_LEN, &[]));
        header.push(' ');
        header.push_str(&format_ascii_field(message.proc_id(), NIL_VALUE, PROC_ID_MAX_LEN, &[]));
        header.push(' ');
        header.push_str(&format_ascii_field(message.msg_id(), NIL_VALUE, MSG_ID_MAX_LEN, &[]));

        for element in message.structured_data() {
            header.push_str(" [");
            header.push_str(&format_sd_name_field(element.sd_id()));
            for (name, value) in element.params() {
                header.push(' ');
                header.push_str(&format_sd_name_field(name));
                header.push_str("=\"");
                header.push_str(&escape_param_value(Some(value)));
                header.push('"');
            }
            header.push(']');
        }

        self.encoding.encode_into(&header, out);

        if let Some(body) = message.message()
            && !body.trim().is_empty()
        {
            out.push(b' ');
            out.extend_from_slice(&UTF8_BOM);
            out.extend_from_slice(body.as_bytes());
        }
    }
}
