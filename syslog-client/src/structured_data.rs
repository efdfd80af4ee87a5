//! RFC 5424 structured data elements.

/// Private enterprise number appended to SD-IDs that carry none.
///
/// 32473 is the number RFC 5424 reserves for documentation examples.
pub const DEFAULT_PRIVATE_ENTERPRISE_NUMBER: &str = "32473";

/// One `SD-ELEMENT`: an identifier and its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredDataElement {
    sd_id: String,
    params: Vec<(String, String)>,
}

impl StructuredDataElement {
    /// Create an element, qualifying `sd_id` with the default enterprise
    /// number when it has no `@`.
    pub fn new<I, K, V>(sd_id: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_enterprise_number(sd_id, DEFAULT_PRIVATE_ENTERPRISE_NUMBER, params)
    }

    /// Create an element, qualifying `sd_id` with `enterprise_number` when it
    /// has no `@`.
    pub fn with_enterprise_number<I, K, V>(
        sd_id: impl Into<String>,
        enterprise_number: &str,
        params: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let sd_id = sd_id.into();
        let sd_id = if sd_id.contains('@') {
            sd_id
        } else {
            format!("{}@{}", sd_id, enterprise_number)
        };

        let mut stored: Vec<(String, String)> = Vec::new();
        for (key, value) in params {
            let key = key.into();
            let value = value.into();
            // Later duplicates overwrite in place so first-seen order wins.
            match stored.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => stored.push((key, value)),
            }
        }

        Self {
            sd_id,
            params: stored,
        }
    }

    /// Canonical `name@number` identifier.
    pub fn sd_id(&self) -> &str {
        &self.sd_id
    }

    /// Parameters in insertion order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a parameter value by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
