use crate::encoding::TextEncoding;
use crate::message::SyslogMessage;

use super::MessageSerializer;

/// Emits only the message body: no header, priority or structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSerializer {
    encoding: TextEncoding,
}

impl LocalSerializer {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }
}

impl Default for LocalSerializer {
    fn default() -> Self {
        Self::new(TextEncoding::Utf8)
    }
}

impl MessageSerializer for LocalSerializer {
    fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn serialize_into(&self, message: &SyslogMessage, out: &mut Vec<u8>) {
        if let Some(body) = message.message()
            && !body.trim().is_empty()
        {
            self.encoding.encode_into(body, out);
        }
    }
}
