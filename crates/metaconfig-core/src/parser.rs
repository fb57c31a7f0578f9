//! Schema node parser
//!
//! Turns document elements into [`MetaElement`]s and [`MetaAttribute`]s.
//! There are three entry points sharing one child classifier:
//!
//! - [`parse_root_element`]: the synthetic container. Only its comment and
//!   attributes are kept; nested `element`/`leaf*` declarations are skipped
//!   because top-level structure is registered as services instead.
//! - [`parse_element`]: a structural element, recursing into elements,
//!   leaves and attributes.
//! - [`parse_leaf`]: an element carrying exactly one value plus attributes
//!   and a comment; nesting an element or another leaf is an error.
//!
//! Type-parameterized tags carry the content type in their suffix:
//! `attributeBoolean`, `leafEnum`.

use std::sync::Arc;

use crate::document::DocumentElement;
use crate::error::{MetaError, MetaResult};
use crate::node::{MaxOccurrences, MetaAttribute, MetaElement, MetaNode};
use crate::value::{parse_value, resolve_content_type};

const ATTRIBUTE_PREFIX: &str = "attribute";
const LEAF_PREFIX: &str = "leaf";

/// What a child declaration is, judged by its tag
enum ChildDecl<'a> {
    Comment(&'a DocumentElement),
    Element(&'a DocumentElement),
    /// Declaration plus content-type suffix
    Attribute(&'a DocumentElement, &'a str),
    Leaf(&'a DocumentElement, &'a str),
    /// Unrecognized tags are ignored
    Other,
}

fn classify(child: &DocumentElement) -> ChildDecl<'_> {
    let tag = child.name();
    if tag == "comment" {
        ChildDecl::Comment(child)
    } else if tag == "element" {
        ChildDecl::Element(child)
    } else if let Some(suffix) = tag.strip_prefix(ATTRIBUTE_PREFIX) {
        ChildDecl::Attribute(child, suffix)
    } else if let Some(suffix) = tag.strip_prefix(LEAF_PREFIX) {
        ChildDecl::Leaf(child, suffix)
    } else {
        ChildDecl::Other
    }
}

/// Fields shared by elements and leaves
struct ElementHeader {
    name: String,
    version: Option<String>,
    min_occurrences: u32,
    max_occurrences: MaxOccurrences,
}

impl ElementHeader {
    fn read(node: &DocumentElement) -> MetaResult<Self> {
        Ok(Self {
            name: required_name(node)?,
            version: node.attribute("version").map(str::to_string),
            min_occurrences: occurrence(node, "minOccurrences")?,
            max_occurrences: MaxOccurrences::from_declared(occurrence(node, "maxOccurrences")?),
        })
    }

    fn into_element(self, comment: Option<String>) -> MetaElement {
        MetaElement {
            name: self.name,
            comment,
            version: self.version,
            min_occurrences: self.min_occurrences,
            max_occurrences: self.max_occurrences,
            value: None,
            children: Vec::new(),
        }
    }
}

/// Parse the `rootElement` section
pub fn parse_root_element(node: &DocumentElement) -> MetaResult<MetaElement> {
    let header = ElementHeader::read(node)?;
    let mut comment = None;
    let mut attributes = Vec::new();

    for child in node.child_elements() {
        match classify(child) {
            ChildDecl::Comment(decl) => comment = Some(comment_text(decl)),
            ChildDecl::Attribute(decl, suffix) => {
                attributes.push(parse_attribute_as(decl, suffix)?)
            }
            ChildDecl::Element(_) | ChildDecl::Leaf(..) | ChildDecl::Other => {}
        }
    }

    let mut root = header.into_element(comment);
    for attribute in attributes {
        root.push_child(attribute);
    }
    Ok(root)
}

/// Parse an `element` declaration and everything below it
pub fn parse_element(node: &DocumentElement) -> MetaResult<MetaElement> {
    let header = ElementHeader::read(node)?;
    let mut comment = None;
    let mut children: Vec<MetaNode> = Vec::new();

    for child in node.child_elements() {
        match classify(child) {
            // last comment wins
            ChildDecl::Comment(decl) => comment = Some(comment_text(decl)),
            ChildDecl::Element(decl) => children.push(Arc::new(parse_element(decl)?).into()),
            ChildDecl::Attribute(decl, suffix) => {
                children.push(parse_attribute_as(decl, suffix)?.into())
            }
            ChildDecl::Leaf(decl, suffix) => {
                children.push(Arc::new(parse_leaf_as(decl, suffix)?).into())
            }
            ChildDecl::Other => {}
        }
    }

    let mut element = header.into_element(comment);
    element.children = children;
    Ok(element)
}

/// Parse a `leaf<Type>` declaration
pub fn parse_leaf(node: &DocumentElement) -> MetaResult<MetaElement> {
    let suffix = node.name().strip_prefix(LEAF_PREFIX).unwrap_or_default();
    parse_leaf_as(node, suffix)
}

/// Parse an `attribute<Type>` declaration
pub fn parse_attribute(node: &DocumentElement) -> MetaResult<MetaAttribute> {
    let suffix = node
        .name()
        .strip_prefix(ATTRIBUTE_PREFIX)
        .unwrap_or_default();
    parse_attribute_as(node, suffix)
}

fn parse_leaf_as(node: &DocumentElement, suffix: &str) -> MetaResult<MetaElement> {
    // Nesting is rejected before any other field is looked at.
    for child in node.child_elements() {
        match classify(child) {
            ChildDecl::Leaf(..) => {
                return Err(MetaError::structural(
                    "Leaf is not allowed to contain leaf",
                    node.path(),
                ))
            }
            ChildDecl::Element(_) => {
                return Err(MetaError::structural(
                    "Leaf is not allowed to contain element",
                    node.path(),
                ))
            }
            _ => {}
        }
    }

    let header = ElementHeader::read(node)?;
    let value = parse_value(node, resolve_content_type(node, suffix)?)?;

    let mut comment = None;
    let mut attributes = Vec::new();
    for child in node.child_elements() {
        match classify(child) {
            ChildDecl::Comment(decl) => comment = Some(comment_text(decl)),
            ChildDecl::Attribute(decl, suffix) => {
                attributes.push(parse_attribute_as(decl, suffix)?)
            }
            _ => {}
        }
    }

    let mut leaf = header.into_element(comment);
    leaf.value = Some(value);
    for attribute in attributes {
        leaf.push_child(attribute);
    }
    Ok(leaf)
}

fn parse_attribute_as(node: &DocumentElement, suffix: &str) -> MetaResult<MetaAttribute> {
    let name = required_name(node)?;
    let value = parse_value(node, resolve_content_type(node, suffix)?)?;

    // Attributes keep their first comment, trimmed.
    let comment = node
        .child_elements()
        .find(|child| child.name() == "comment")
        .map(|decl| comment_text(decl).trim().to_string());

    Ok(MetaAttribute {
        name,
        comment,
        version: node.attribute("version").map(str::to_string),
        required: node
            .attribute("required")
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true")),
        value,
    })
}

fn required_name(node: &DocumentElement) -> MetaResult<String> {
    node.attribute("name")
        .map(str::to_string)
        .ok_or_else(|| MetaError::structural("No name found", node.path()))
}

fn occurrence(node: &DocumentElement, field: &str) -> MetaResult<u32> {
    let raw = node.attribute(field).unwrap_or_default();
    raw.trim().parse::<u32>().map_err(|err| {
        MetaError::format(
            format!("Invalid value '{}' of attribute '{}': {}", raw, field, err),
            node.path(),
        )
    })
}

fn comment_text(decl: &DocumentElement) -> String {
    decl.text().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::ErrorKind;
    use crate::value::MetaValue;

    fn first(doc: &Document) -> &DocumentElement {
        doc.root().child_elements().next().unwrap()
    }

    #[test]
    fn test_element_with_children_in_declaration_order() {
        let doc = Document::parse(
            r#"<s><element name="Domain" minOccurrences="1" maxOccurrences="1" version="6.1">
                 <comment>The domain</comment>
                 <attributeBoolean name="enabled" required="true"><default>true</default></attributeBoolean>
                 <leafString name="Name" minOccurrences="0" maxOccurrences="1">
                   <maxLength>0</maxLength><default>ospl</default>
                 </leafString>
                 <element name="Lease" minOccurrences="0" maxOccurrences="0"/>
                 <unknownTag/>
               </element></s>"#,
        )
        .unwrap();

        let element = parse_element(first(&doc)).unwrap();
        assert_eq!(element.name(), "Domain");
        assert_eq!(element.version(), Some("6.1"));
        assert_eq!(element.comment(), Some("The domain"));
        let names: Vec<_> = element.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["enabled", "Name", "Lease"]);

        let lease = element.child_element("Lease").unwrap();
        assert!(lease.max_occurrences().is_unbounded());
        assert!(!lease.is_leaf());

        let name = element.child_element("Name").unwrap();
        assert!(name.is_leaf());
        assert_eq!(name.value().unwrap().default_text(), "ospl");
    }

    #[test]
    fn test_last_comment_wins() {
        let doc = Document::parse(
            r#"<s><element name="e" minOccurrences="0" maxOccurrences="1">
                 <comment>first</comment><comment>second</comment>
               </element></s>"#,
        )
        .unwrap();
        assert_eq!(parse_element(first(&doc)).unwrap().comment(), Some("second"));
    }

    #[test]
    fn test_root_skips_nested_structure() {
        let doc = Document::parse(
            r#"<s><rootElement name="OpenSplice" minOccurrences="1" maxOccurrences="1">
                 <element name="Domain" minOccurrences="1" maxOccurrences="1"/>
                 <leafInt name="Id" minOccurrences="1" maxOccurrences="1"><default>0</default></leafInt>
                 <attributeString name="tag"><maxLength>0</maxLength><default/></attributeString>
               </rootElement></s>"#,
        )
        .unwrap();

        let root = parse_root_element(first(&doc)).unwrap();
        assert_eq!(root.elements().count(), 0);
        assert_eq!(root.attributes().count(), 1);
    }

    #[test]
    fn test_root_does_not_validate_skipped_children() {
        // a broken nested element below the root is never looked at
        let doc = Document::parse(
            r#"<s><rootElement name="OpenSplice" minOccurrences="1" maxOccurrences="1">
                 <element minOccurrences="x"/>
               </rootElement></s>"#,
        )
        .unwrap();
        assert!(parse_root_element(first(&doc)).is_ok());
    }

    #[test]
    fn test_leaf_nesting_leaf_fails_even_without_name() {
        let doc = Document::parse(
            r#"<s><leafInt><leafInt name="x" minOccurrences="1" maxOccurrences="1"/></leafInt></s>"#,
        )
        .unwrap();
        let err = parse_leaf(first(&doc)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(err.to_string().contains("Leaf is not allowed to contain leaf"));
        assert_eq!(err.path(), Some("/s/leafInt"));
    }

    #[test]
    fn test_leaf_nesting_element_fails() {
        let doc = Document::parse(
            r#"<s><leafInt name="x" minOccurrences="1" maxOccurrences="1">
                 <default>1</default><element name="y" minOccurrences="1" maxOccurrences="1"/>
               </leafInt></s>"#,
        )
        .unwrap();
        let err = parse_leaf(first(&doc)).unwrap_err();
        assert!(err.to_string().contains("Leaf is not allowed to contain element"));
    }

    #[test]
    fn test_leaf_with_attribute_and_comment() {
        let doc = Document::parse(
            r#"<s><leafEnum name="Mode" minOccurrences="1" maxOccurrences="1">
                 <comment>raw </comment>
                 <value>fast</value><value>safe</value><default>safe</default>
                 <attributeInt name="weight"><comment> w </comment><default>2</default></attributeInt>
               </leafEnum></s>"#,
        )
        .unwrap();
        let leaf = parse_leaf(first(&doc)).unwrap();
        assert_eq!(leaf.comment(), Some("raw "));
        assert_eq!(
            leaf.value(),
            Some(&MetaValue::Enum {
                default: "safe".into(),
                values: vec!["fast".into(), "safe".into()]
            })
        );
        let weight = leaf.attribute("weight").unwrap();
        assert_eq!(weight.comment(), Some("w"));
        assert!(!weight.is_required());
    }

    #[test]
    fn test_missing_name_is_structural() {
        let doc = Document::parse(
            r#"<s><element minOccurrences="1" maxOccurrences="1"/></s>"#,
        )
        .unwrap();
        let err = parse_element(first(&doc)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(err.to_string().starts_with("No name found"));

        let doc = Document::parse(r#"<s><attributeInt><default>1</default></attributeInt></s>"#)
            .unwrap();
        assert_eq!(
            parse_attribute(first(&doc)).unwrap_err().kind(),
            ErrorKind::Structural
        );
    }

    #[test]
    fn test_non_numeric_occurrences_are_format_errors() {
        for (min, max) in [("one", "1"), ("1", "many"), ("-1", "1"), ("", "1")] {
            let xml = format!(
                r#"<s><element name="e" minOccurrences="{}" maxOccurrences="{}"/></s>"#,
                min, max
            );
            let doc = Document::parse(&xml).unwrap();
            let err = parse_element(first(&doc)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "{} {}", min, max);
            assert_eq!(err.path(), Some("/s/element"));
        }
    }

    #[test]
    fn test_min_above_max_is_accepted() {
        let doc = Document::parse(
            r#"<s><element name="e" minOccurrences="5" maxOccurrences="2"/></s>"#,
        )
        .unwrap();
        let element = parse_element(first(&doc)).unwrap();
        assert_eq!(element.min_occurrences(), 5);
        assert_eq!(element.max_occurrences().get(), Some(2));
    }

    #[test]
    fn test_unknown_attribute_type_fails() {
        let doc = Document::parse(
            r#"<s><element name="e" minOccurrences="1" maxOccurrences="1">
                 <attributeColour name="c"><default>red</default></attributeColour>
               </element></s>"#,
        )
        .unwrap();
        let err = parse_element(first(&doc)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType);
        assert_eq!(err.path(), Some("/s/element/attributeColour"));
    }

    #[test]
    fn test_required_flag_is_lenient() {
        for (flag, expected) in [("true", true), ("TRUE", true), ("yes", false), ("", false)] {
            let xml = format!(
                r#"<s><attributeBoolean name="a" required="{}"><default>false</default></attributeBoolean></s>"#,
                flag
            );
            let doc = Document::parse(&xml).unwrap();
            assert_eq!(parse_attribute(first(&doc)).unwrap().is_required(), expected);
        }
    }

    #[test]
    fn test_type_suffix_is_case_insensitive() {
        let doc = Document::parse(
            r#"<s><attributeINT name="a"><default>1</default></attributeINT></s>"#,
        )
        .unwrap();
        let attribute = parse_attribute(first(&doc)).unwrap();
        assert_eq!(
            attribute.value(),
            &MetaValue::Int {
                default: 1,
                min: i32::MIN,
                max: i32::MAX
            }
        );
    }

    #[test]
    fn test_nested_error_path_points_at_offending_node() {
        let doc = Document::parse(
            r#"<s><element name="a" minOccurrences="1" maxOccurrences="1">
                 <element name="b" minOccurrences="1" maxOccurrences="1">
                   <leafLong name="c" minOccurrences="1" maxOccurrences="1"/>
                 </element>
               </element></s>"#,
        )
        .unwrap();
        let err = parse_element(first(&doc)).unwrap_err();
        assert_eq!(err.path(), Some("/s/element/element/leafLong"));
        assert!(err.to_string().contains("contentType 'LONG'"));
    }
}
