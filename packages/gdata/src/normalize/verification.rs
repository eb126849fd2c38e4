//! Second pass over site entries that builds the `verification_methods` map.
//!
//! The generic flattener stores `wt:verification-method` children as a list
//! of texts and loses the `type` attribute that tells them apart. This pass
//! reads the raw entry again and keys each method's text by that attribute.

use roxmltree::Node;

use super::types::{NormalizedRecord, RecordValue};
use crate::xml::{find_children, get_text};

/// Record key the verification map is stored under.
pub const VERIFICATION_METHODS_KEY: &str = "verification_methods";

const VERIFICATION_METHOD_TAG: &str = "verification-method";

/// Attach `verification_methods` to a flattened site entry.
///
/// `node` must be the element `record` was flattened from. Each
/// `verification-method` child contributes `type attribute -> cleaned text`;
/// the attribute is used verbatim as the key. The key is always set, to an
/// empty map when the entry has no such children, replacing anything the
/// generic pass put there.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gdata_client::normalize::{extract_verification_methods, flatten};
///
/// let xml = r#"<entry xmlns:wt="http://schemas.google.com/webmasters/tools/2007">
///     <wt:verification-method type="htmlpage" in-use="false">google937559d39027a39d.html</wt:verification-method>
/// </entry>"#;
/// let doc = Document::parse(xml).unwrap();
/// let entry = doc.root_element();
/// let record = extract_verification_methods(entry, flatten(entry));
///
/// let methods = record.get("verification_methods").unwrap().as_record().unwrap();
/// assert_eq!(methods.get_str("htmlpage"), Some("google937559d39027a39d.html"));
/// ```
pub fn extract_verification_methods(node: Node<'_, '_>, mut record: NormalizedRecord) -> NormalizedRecord {
    let mut methods = NormalizedRecord::new();

    for method in find_children(node, VERIFICATION_METHOD_TAG) {
        let Some(kind) = method.attribute("type") else {
            tracing::debug!("Skipping verification method without type attribute");
            continue;
        };
        methods.set(kind, RecordValue::Scalar(clean_text(get_text(method))));
    }

    record.set(VERIFICATION_METHODS_KEY, RecordValue::Nested(methods));
    record
}

/// Strip every backslash from a method's text.
///
/// The parser has already decoded the one level of entities the document
/// carries; nothing is decoded a second time.
fn clean_text(text: &str) -> String {
    text.replace('\\', "")
}
