//! Generic document tree consumed by the schema parsers
//!
//! The parsers never see XML directly. They walk an owned element tree in
//! which every element knows its own slash path (`/splice_meta_config/element`),
//! so error reporting needs no parent links.
//!
//! # Example
//!
//! ```rust
//! use metaconfig_core::document::Document;
//!
//! let doc = Document::parse(r#"<splice_meta_config version="6.1"/>"#).unwrap();
//! assert_eq!(doc.root().name(), "splice_meta_config");
//! assert_eq!(doc.root().attribute("version"), Some("6.1"));
//! ```

use crate::error::MetaResult;

/// A parsed schema document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: DocumentElement,
}

impl Document {
    /// Wrap a root element, assigning paths to the whole tree
    pub fn new(mut root: DocumentElement) -> Self {
        root.assign_paths("");
        Self { root }
    }

    /// Parse XML text into a document tree
    pub fn parse(text: &str) -> MetaResult<Self> {
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = true;
        let xml = roxmltree::Document::parse_with_options(text, options)?;
        Ok(Self::new(convert(xml.root_element())))
    }

    /// The document element
    pub fn root(&self) -> &DocumentElement {
        &self.root
    }
}

/// A child of an element
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Element(DocumentElement),
    Text(String),
}

/// An element: tag name, attributes in document order, ordered children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentElement {
    name: String,
    path: String,
    attributes: Vec<(String, String)>,
    children: Vec<DocumentNode>,
}

impl DocumentElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: DocumentElement) -> Self {
        self.children.push(DocumentNode::Element(child));
        self
    }

    /// Append a text node
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(DocumentNode::Text(text.into()));
        self
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slash path from the document root, e.g. `/splice_meta_config/rootElement`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Attribute value, `None` when the attribute is absent
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All children, elements and text, in document order
    pub fn children(&self) -> &[DocumentNode] {
        &self.children
    }

    /// Element children in document order
    pub fn child_elements(&self) -> impl Iterator<Item = &DocumentElement> {
        self.children.iter().filter_map(|child| match child {
            DocumentNode::Element(element) => Some(element),
            DocumentNode::Text(_) => None,
        })
    }

    /// Concatenated direct text content, `None` for an element without text
    /// children (`<default/>`)
    pub fn text(&self) -> Option<String> {
        let mut texts = self.children.iter().filter_map(|child| match child {
            DocumentNode::Text(text) => Some(text.as_str()),
            DocumentNode::Element(_) => None,
        });
        let first = texts.next()?;
        Some(texts.fold(first.to_string(), |mut acc, text| {
            acc.push_str(text);
            acc
        }))
    }

    fn assign_paths(&mut self, parent: &str) {
        self.path = format!("{}/{}", parent, self.name);
        let path = self.path.clone();
        for child in &mut self.children {
            if let DocumentNode::Element(element) = child {
                element.assign_paths(&path);
            }
        }
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> DocumentElement {
    let mut element = DocumentElement::new(node.tag_name().name());
    for attribute in node.attributes() {
        element
            .attributes
            .push((attribute.name().to_string(), attribute.value().to_string()));
    }
    for child in node.children() {
        if child.is_element() {
            element.children.push(DocumentNode::Element(convert(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(DocumentNode::Text(text.to_string()));
            }
        }
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assigns_paths() {
        let doc = Document::parse(
            r#"<splice_meta_config version="6.1">
                 <element name="Domain"><leafInt name="Id"/></element>
               </splice_meta_config>"#,
        )
        .unwrap();

        let element = doc.root().child_elements().next().unwrap();
        assert_eq!(element.path(), "/splice_meta_config/element");
        let leaf = element.child_elements().next().unwrap();
        assert_eq!(leaf.path(), "/splice_meta_config/element/leafInt");
    }

    #[test]
    fn test_builder_paths_assigned_on_wrap() {
        let doc = Document::new(
            DocumentElement::new("a").with_child(DocumentElement::new("b").with_text("x")),
        );
        let b = doc.root().child_elements().next().unwrap();
        assert_eq!(b.path(), "/a/b");
        assert_eq!(b.text().as_deref(), Some("x"));
    }

    #[test]
    fn test_absent_and_empty_attributes_differ() {
        let doc = Document::parse(r#"<a name=""/>"#).unwrap();
        assert_eq!(doc.root().attribute("name"), Some(""));
        assert_eq!(doc.root().attribute("version"), None);
    }

    #[test]
    fn test_empty_element_has_no_text() {
        let doc = Document::parse("<a><default/><value></value><x> y </x></a>").unwrap();
        let children: Vec<_> = doc.root().child_elements().collect();
        assert_eq!(children[0].text(), None);
        assert_eq!(children[1].text(), None);
        assert_eq!(children[2].text().as_deref(), Some(" y "));
    }

    #[test]
    fn test_comments_and_cdata() {
        let doc = Document::parse("<a><!-- ignored --><comment><![CDATA[<b>]]></comment></a>")
            .unwrap();
        let children: Vec<_> = doc.root().child_elements().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text().as_deref(), Some("<b>"));
    }

    #[test]
    fn test_malformed_document_is_resource_error() {
        let err = Document::parse("<a><b></a>").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Resource);
        assert!(err.to_string().contains("Parse error at line"));
    }
}
