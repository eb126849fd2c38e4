//! Recursive conversion of an XML element into a [`NormalizedRecord`].

use roxmltree::{Attribute, Node};

use super::key::normalize_key;
use super::types::{NormalizedRecord, RecordValue};
use crate::xml::{element_children, get_text, has_element_children, qualified_name};

/// Flatten one element into a record.
///
/// Child elements are visited first, then attributes, both in document order.
/// A child with element children of its own becomes a `Nested` record, and so
/// does an attribute-only child such as `<link rel="next" href="..."/>`;
/// otherwise the child's text is used. Repeated keys coalesce into a `List`
/// and empty values are dropped (see [`NormalizedRecord::insert`]).
///
/// The tree is assumed to be well formed; nothing is validated here.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gdata_client::normalize::{flatten, RecordValue};
///
/// let xml = r#"<entry xmlns:wt="http://schemas.google.com/webmasters/tools/2007">
///     <title>http://www.mysite.com/</title>
///     <wt:verified>true</wt:verified>
/// </entry>"#;
/// let doc = Document::parse(xml).unwrap();
/// let record = flatten(doc.root_element());
///
/// assert_eq!(record.get_str("title"), Some("http://www.mysite.com/"));
/// assert_eq!(record.get("verified"), Some(&RecordValue::Bool(true)));
/// ```
pub fn flatten(node: Node<'_, '_>) -> NormalizedRecord {
    let mut record = NormalizedRecord::new();

    for child in element_children(node) {
        let key = normalize_key(&qualified_name(child));
        let text = get_text(child);
        let value = if has_element_children(child) || (text.is_empty() && has_attributes(child)) {
            RecordValue::Nested(flatten(child))
        } else {
            RecordValue::Scalar(text.to_string())
        };
        record.insert(key, value);
    }

    for attr in node.attributes() {
        let key = normalize_key(&attribute_name(node, &attr));
        record.insert(key, RecordValue::Scalar(attr.value().to_string()));
    }

    record
}

fn has_attributes(node: Node<'_, '_>) -> bool {
    node.attributes().next().is_some()
}

/// `prefix:local` for namespaced attributes, `local` otherwise.
fn attribute_name(node: Node<'_, '_>, attr: &Attribute<'_, '_>) -> String {
    match attr.namespace().and_then(|ns| node.lookup_prefix(ns)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", attr.name()),
        _ => attr.name().to_string(),
    }
}
