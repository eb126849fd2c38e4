//! Key derivation and value coercion.

use regex::Regex;
use std::sync::LazyLock;

use super::types::RecordValue;

/// Runs of characters that cannot appear in a key.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid regex"));

/// Derive a record key from an element or attribute name.
///
/// Everything up to and including the last `:` is dropped, then each run of
/// non-alphanumeric characters becomes a single `_`. Case is kept.
///
/// # Examples
/// ```
/// use gdata_client::normalize::normalize_key;
///
/// assert_eq!(normalize_key("wt:verification-method"), "verification_method");
/// assert_eq!(normalize_key("in-use"), "in_use");
/// assert_eq!(normalize_key("inputValue"), "inputValue");
/// ```
pub fn normalize_key(name: &str) -> String {
    let local = name.rsplit_once(':').map_or(name, |(_, local)| local);
    NON_ALPHANUMERIC.replace_all(local, "_").into_owned()
}

/// Turn raw text into a record value.
///
/// Only the exact strings `"true"` and `"false"` become booleans.
pub fn coerce_value(text: String) -> RecordValue {
    match text.as_str() {
        "true" => RecordValue::Bool(true),
        "false" => RecordValue::Bool(false),
        _ => RecordValue::Scalar(text),
    }
}
