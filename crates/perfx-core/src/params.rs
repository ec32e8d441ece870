//! Query-string value codecs
//!
//! Low-level encode/decode of single URL query values. Every parser returns
//! `Option` and never errors: callers substitute the field default on `None`.
//!
//! Id lists are comma-joined with each member percent-encoded on its own,
//! so a literal comma inside an id survives as `%2C` while the separator
//! stays readable (`branches=b1,b2,b3`).

use chrono::{DateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::{DimensionSet, ResourceId};

/// Characters left unescaped inside a query value
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a free-form value
pub fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Decode a raw query value (`+` is a space, then percent-decoding)
pub fn decode_value(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parse a comma-joined id list; blank members and duplicates are dropped
pub fn parse_ids(raw: &str) -> DimensionSet {
    raw.split(',')
        .filter_map(|member| ResourceId::new(decode_value(member)))
        .collect()
}

/// Format an id set as a comma-joined list
pub fn format_ids(ids: &DimensionSet) -> String {
    ids.iter()
        .map(|id| utf8_percent_encode(id.as_str(), QUERY_VALUE).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a single nullable id
pub fn parse_id(raw: &str) -> Option<ResourceId> {
    ResourceId::new(decode_value(raw))
}

/// Parse `true`/`false` (case-insensitive)
pub fn parse_bool(raw: &str) -> Option<bool> {
    let value = decode_value(raw);
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Parse an integer in `1..=max`
pub fn parse_positive(raw: &str, max: u32) -> Option<u32> {
    let value: i64 = decode_value(raw).trim().parse().ok()?;
    if (1..=i64::from(max)).contains(&value) {
        u32::try_from(value).ok()
    } else {
        None
    }
}

/// Parse a timestamp written as milliseconds since the Unix epoch
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = decode_value(raw).trim().parse().ok()?;
    DateTime::from_timestamp_millis(millis)
}

pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.timestamp_millis().to_string()
}

/// Join encoded `(key, value)` pairs into a query string
pub fn join_pairs<K: AsRef<str>, V: AsRef<str>>(pairs: impl IntoIterator<Item = (K, V)>) -> String {
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key.as_ref(), value.as_ref()))
        .collect::<Vec<_>>()
        .join("&")
}
