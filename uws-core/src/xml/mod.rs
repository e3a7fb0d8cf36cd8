//! XML access helpers
//!
//! Decoding of raw response bytes, document parsing and the two field lookups
//! every model shares: one that fails when a protocol-required element is
//! absent, one that reports absence as `None`.

pub mod namespace;

pub use namespace::{
    ElementResolver, UWS_1_NAMESPACE, UwsElement, UwsNamespace, XLINK_NAMESPACE, require_xlink,
};

use roxmltree::{Document, Node};

use crate::error::{Result, UwsError};

/// Protocol version assumed when a document carries no `version` attribute
pub const DEFAULT_VERSION: &str = "1.0";

/// Decode a response body as UTF-8, dropping a leading byte-order mark
pub fn decode(xml: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(xml)
        .map_err(|e| UwsError::MalformedDocument(format!("response is not UTF-8: {}", e)))?;
    Ok(text.trim_start_matches('\u{feff}'))
}

/// Parse decoded text into an XML document
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    Document::parse(text).map_err(|e| UwsError::MalformedDocument(e.to_string()))
}

/// `version` attribute of a document root, defaulting to 1.0
pub fn version_of(root: Node<'_, '_>) -> String {
    root.attribute("version")
        .unwrap_or(DEFAULT_VERSION)
        .to_string()
}

/// Loose boolean as used in UWS attributes: case-insensitive "true", anything else is false
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Element children of a node, skipping text and comments
pub fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

/// Local tag name of a node, for error messages
pub fn tag_of(node: Node<'_, '_>) -> String {
    node.tag_name().name().to_string()
}

/// Trimmed text content, `None` when empty or nil
fn text_of(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Namespace-qualified field lookup over the children of one element
pub struct Fields<'a, 'input> {
    node: Node<'a, 'input>,
    resolver: &'a dyn ElementResolver,
}

impl<'a, 'input> Fields<'a, 'input> {
    pub fn new(node: Node<'a, 'input>, resolver: &'a dyn ElementResolver) -> Self {
        Self { node, resolver }
    }

    /// First child element with the given name
    pub fn child(&self, element: UwsElement) -> Option<Node<'a, 'input>> {
        let name = self.resolver.qualified(element);
        self.node.children().find(|n| n.has_tag_name(name))
    }

    /// All child elements with the given name, in document order
    pub fn children(&self, element: UwsElement) -> impl Iterator<Item = Node<'a, 'input>> {
        let name = self.resolver.qualified(element);
        self.node.children().filter(move |n| n.has_tag_name(name))
    }

    /// A required element whose value may be nil
    ///
    /// # Errors
    /// `MissingMandatoryField` when the element is absent.
    pub fn mandatory(&self, element: UwsElement) -> Result<Option<String>> {
        self.child(element)
            .map(text_of)
            .ok_or_else(|| UwsError::MissingMandatoryField(self.resolver.clark_name(element)))
    }

    /// A required element that must also carry a value
    ///
    /// # Errors
    /// `MissingMandatoryField` when the element is absent, `MalformedElement` when it is empty.
    pub fn mandatory_value(&self, element: UwsElement) -> Result<String> {
        self.mandatory(element)?
            .ok_or_else(|| UwsError::malformed(element.local_name(), "element has no value"))
    }

    /// An optional element; absent and empty both read as `None`
    pub fn optional(&self, element: UwsElement) -> Option<String> {
        self.child(element).and_then(text_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"
        xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" version="1.1">
        <uws:jobId> abc </uws:jobId>
        <uws:startTime xsi:nil="true"/>
        <jobId>unqualified</jobId>
    </uws:job>"#;

    #[test]
    fn test_mandatory_and_optional_lookups() {
        let doc = parse_document(DOC).unwrap();
        let root = doc.root_element();
        let ns = UwsNamespace::resolve(root).unwrap();
        let fields = Fields::new(root, &ns);

        assert_eq!(fields.mandatory_value(UwsElement::JobId).unwrap(), "abc");
        assert_eq!(fields.mandatory(UwsElement::StartTime).unwrap(), None);
        assert!(matches!(
            fields.mandatory_value(UwsElement::StartTime),
            Err(UwsError::MalformedElement { .. })
        ));
        assert!(matches!(
            fields.mandatory(UwsElement::Destruction),
            Err(UwsError::MissingMandatoryField(name)) if name.ends_with("}destruction")
        ));
        assert_eq!(fields.optional(UwsElement::RunId), None);
        assert_eq!(fields.children(UwsElement::JobId).count(), 1);
    }

    #[test]
    fn test_version_defaults_to_1_0() {
        let doc = parse_document("<a/>").unwrap();
        assert_eq!(version_of(doc.root_element()), "1.0");

        let doc = parse_document(DOC).unwrap();
        assert_eq!(version_of(doc.root_element()), "1.1");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(Some("true")));
        assert!(parse_bool(Some("TRUE")));
        assert!(!parse_bool(Some("yes")));
        assert!(!parse_bool(Some("false")));
        assert!(!parse_bool(None));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(matches!(
            decode(&[0x3c, 0xff, 0xfe]),
            Err(UwsError::MalformedDocument(_))
        ));
        assert_eq!(decode("\u{feff}<a/>".as_bytes()).unwrap(), "<a/>");
    }

    #[test]
    fn test_parse_document_rejects_broken_xml() {
        assert!(matches!(
            parse_document("<a><b></a>"),
            Err(UwsError::MalformedDocument(_))
        ));
    }
}
