//! Field truncation, ASCII filtering and escaping shared by the serializers.

use std::borrow::Cow;

/// Placeholder for an absent RFC 5424 header field.
pub const NIL_VALUE: &str = "-";

/// Characters an SD-NAME may not contain (besides non-printables).
pub const SD_NAME_DISALLOWED: [char; 4] = [' ', '=', ']', '"'];

/// Maximum length of an SD-ID or PARAM-NAME.
pub const SD_NAME_MAX_LEN: usize = 32;

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Truncate `value` to at most `max_len` characters.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn ensure_max_length(value: &str, max_len: usize) -> &str {
    match value.char_indices().nth(max_len) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Return `nil_value` for absent or whitespace-only input, otherwise the
/// value, truncated when `max_len` is given.
pub fn format_field<'a>(
    value: Option<&'a str>,
    nil_value: &'a str,
    max_len: Option<usize>,
) -> &'a str {
    match value {
        Some(v) if !is_blank(Some(v)) => match max_len {
            Some(max) => ensure_max_length(v, max),
            None => v,
        },
        _ => nil_value,
    }
}

/// [`format_field`], then keep only printable ASCII (33..=126) that is not
/// in `exclude`. Dropped characters are omitted, not substituted.
pub fn format_ascii_field(
    value: Option<&str>,
    nil_value: &str,
    max_len: usize,
    exclude: &[char],
) -> String {
    format_field(value, nil_value, Some(max_len))
        .chars()
        .filter(|c| matches!(*c as u32, 33..=126) && !exclude.contains(c))
        .collect()
}

/// Format an SD-ID or PARAM-NAME.
pub fn format_sd_name_field(value: &str) -> String {
    format_ascii_field(Some(value), NIL_VALUE, SD_NAME_MAX_LEN, &SD_NAME_DISALLOWED)
}

/// Escape a PARAM-VALUE: backslash first, then quote, then closing bracket.
pub fn escape_param_value(value: Option<&str>) -> Cow<'_, str> {
    let Some(value) = value else {
        return Cow::Borrowed("");
    };
    if !value.contains(['\\', '"', ']']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace(']', "\\]"),
    )
}
