//! Record types produced by the feed normalizer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::key::coerce_value;

/// A value stored under one key of a [`NormalizedRecord`].
///
/// Serializes untagged, so a record renders as plain JSON: strings, booleans,
/// objects and arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Bool(bool),
    Scalar(String),
    Nested(NormalizedRecord),
    List(Vec<RecordValue>),
}

impl RecordValue {
    /// The string content of a `Scalar`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The flag of a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&NormalizedRecord> {
        match self {
            Self::Nested(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[RecordValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether the value carries no data and must not be stored.
    fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_empty(),
            Self::Nested(r) => r.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(_) => false,
        }
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<bool> for RecordValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NormalizedRecord> for RecordValue {
    fn from(r: NormalizedRecord) -> Self {
        Self::Nested(r)
    }
}

/// An ordered key/value record built from one XML element.
///
/// Keys keep first-insertion order. The shape is whatever the source element
/// looked like; there is no fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: IndexMap<String, RecordValue>,
}

impl NormalizedRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value with the coalescing rules of the flattener.
    ///
    /// - empty values are dropped and never overwrite anything;
    /// - a new key stores the value, coercing `"true"`/`"false"` scalars to `Bool`;
    /// - a key holding a single value is turned into a list of the old value
    ///   followed by the new one;
    /// - a key holding a list gets the value appended.
    ///
    /// Appended values are stored as given, so `"false"` arriving second stays
    /// a `Scalar`.
    pub fn insert(&mut self, key: impl Into<String>, value: RecordValue) {
        if value.is_empty() {
            return;
        }

        let key = key.into();
        match self.fields.get_mut(&key) {
            None => {
                let value = match value {
                    RecordValue::Scalar(s) => coerce_value(s),
                    other => other,
                };
                self.fields.insert(key, value);
            }
            Some(RecordValue::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, RecordValue::List(Vec::with_capacity(2)));
                if let RecordValue::List(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
        }
    }

    /// Store a value under `key`, replacing whatever was there.
    ///
    /// Bypasses coalescing and the empty check; used by specialized passes
    /// that own a key outright.
    pub fn set(&mut self, key: impl Into<String>, value: RecordValue) {
        self.fields.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.fields.get(key)
    }

    /// Shorthand for `get(key).and_then(RecordValue::as_str)`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RecordValue::as_str)
    }

    /// Shorthand for `get(key).and_then(RecordValue::as_bool)`.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(RecordValue::as_bool)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, RecordValue)> for NormalizedRecord {
    /// Builds a record through [`NormalizedRecord::insert`], so the same
    /// coalescing rules apply.
    fn from_iter<I: IntoIterator<Item = (K, RecordValue)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_new_key_coerces_booleans() {
        let mut record = NormalizedRecord::new();
        record.insert("verified", "true".into());
        record.insert("indexed", "false".into());
        record.insert("title", "True".into());

        assert_eq!(record.get("verified"), Some(&RecordValue::Bool(true)));
        assert_eq!(record.get("indexed"), Some(&RecordValue::Bool(false)));
        assert_eq!(record.get_str("title"), Some("True"));
    }

    #[test]
    fn test_insert_skips_empty_values() {
        let mut record = NormalizedRecord::new();
        record.insert("title", "".into());
        record.insert("author", NormalizedRecord::new().into());
        assert!(record.is_empty());

        record.insert("title", "kept".into());
        record.insert("title", "".into());
        assert_eq!(record.get_str("title"), Some("kept"));
    }

    #[test]
    fn test_insert_coalesces_into_list() {
        let mut record = NormalizedRecord::new();
        record.insert("href", "a".into());
        record.insert("href", "b".into());
        record.insert("href", "c".into());

        assert_eq!(
            record.get("href"),
            Some(&RecordValue::List(vec!["a".into(), "b".into(), "c".into()]))
        );
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_appended_values_are_not_coerced() {
        let mut record = NormalizedRecord::new();
        record.insert("indexed", "true".into());
        record.insert("indexed", "false".into());

        assert_eq!(
            record.get("indexed"),
            Some(&RecordValue::List(vec![
                RecordValue::Bool(true),
                RecordValue::Scalar("false".to_string()),
            ]))
        );
    }

    #[test]
    fn test_set_replaces_and_allows_empty() {
        let mut record = NormalizedRecord::new();
        record.insert("verification_methods", "x".into());
        record.set("verification_methods", NormalizedRecord::new().into());

        assert_eq!(
            record.get("verification_methods"),
            Some(&RecordValue::Nested(NormalizedRecord::new()))
        );
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let record: NormalizedRecord = [
            ("id", RecordValue::from("1")),
            ("title", RecordValue::from("t")),
            ("updated", RecordValue::from("2008-01-01")),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["id", "title", "updated"]);
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let mut inner = NormalizedRecord::new();
        inner.insert("href", "a".into());

        let mut record = NormalizedRecord::new();
        record.insert("title", "t".into());
        record.insert("verified", "true".into());
        record.insert("link", inner.clone().into());
        record.insert("link", inner.into());

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"title":"t","verified":true,"link":[{"href":"a"},{"href":"a"}]}"#
        );
    }
}
