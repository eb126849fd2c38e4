//! XML utility functions for navigating feed DOM trees.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gdata_client::xml::get_tag_name;
///
/// let xml = r#"<feed xmlns:wt="http://schemas.google.com/webmasters/tools/2007"><wt:verified>true</wt:verified></feed>"#;
/// let doc = Document::parse(xml).unwrap();
/// let verified = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(verified), "verified");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find all child elements with the given local tag name.
///
/// The namespace is ignored, so `entry` matches both `<entry>` and
/// `<atom:entry>`.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gdata_client::xml::find_children;
///
/// let xml = r#"<feed><entry/><link/><entry/></feed>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let entries: Vec<_> = find_children(doc.root_element(), "entry").collect();
/// assert_eq!(entries.len(), 2);
/// ```
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find the first child element with the given local tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Get all element children of a node.
///
/// Text nodes, comments and processing instructions are skipped.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Check whether a node has at least one element child.
pub fn has_element_children(node: Node<'_, '_>) -> bool {
    node.children().any(|child| child.is_element())
}

/// Get the first text child of a node, untrimmed.
///
/// Comments or processing instructions before the text are skipped. Returns
/// an empty string when the node has no text. Entities are already decoded by
/// the parser.
pub fn get_text<'a>(node: Node<'a, '_>) -> &'a str {
    node.children()
        .find(|child| child.is_text())
        .and_then(|child| child.text())
        .unwrap_or_default()
}

/// Get the qualified name of a node as `prefix:local`, or just `local` when
/// the element is unprefixed.
pub fn qualified_name(node: Node<'_, '_>) -> String {
    let local = get_tag_name(node);
    match node
        .tag_name()
        .namespace()
        .and_then(|ns| node.lookup_prefix(ns))
    {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:root xmlns:ns="http://example.com"><ns:child/></ns:root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_find_children_ignores_namespace() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:wt="http://schemas.google.com/webmasters/tools/2007">
            <wt:keyword>a</wt:keyword><entry/><wt:keyword>b</wt:keyword>
        </feed>"#;
        let doc = Document::parse(xml).unwrap();

        let keywords: Vec<_> = find_children(doc.root_element(), "keyword")
            .map(get_text)
            .collect();
        assert_eq!(keywords, vec!["a", "b"]);
    }

    #[test]
    fn test_find_child() {
        let xml = r#"<entry><title>t</title><content type="text">v</content></entry>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert!(find_child(root, "content").is_some());
        assert!(find_child(root, "missing").is_none());
    }

    #[test]
    fn test_element_children() {
        let xml = r#"<root>text<child1/><!-- c -->more<child2/></root>"#;
        let doc = Document::parse(xml).unwrap();

        assert_eq!(element_children(doc.root_element()).count(), 2);
        assert!(has_element_children(doc.root_element()));
    }

    #[test]
    fn test_get_text_untrimmed() {
        let xml = r#"<root><a>  padded  </a><b/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(get_text(find_child(root, "a").unwrap()), "  padded  ");
        assert_eq!(get_text(find_child(root, "b").unwrap()), "");
    }

    #[test]
    fn test_get_text_after_comment() {
        let xml = r#"<entry><title><!--c-->x</title><id><?pi data?>42<!--tail--></id></entry>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(get_text(find_child(root, "title").unwrap()), "x");
        assert_eq!(get_text(find_child(root, "id").unwrap()), "42");
    }

    #[test]
    fn test_qualified_name() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:wt="http://schemas.google.com/webmasters/tools/2007"><wt:verified/><title/></feed>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(qualified_name(find_child(root, "verified").unwrap()), "wt:verified");
        assert_eq!(qualified_name(find_child(root, "title").unwrap()), "title");
    }
}
