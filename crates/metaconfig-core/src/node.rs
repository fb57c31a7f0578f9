//! Meta-model nodes
//!
//! The built schema tree: elements with occurrence bounds and ordered
//! children, attributes with exactly one value. Nodes are immutable once the
//! parser returns them; elements sit behind [`Arc`] so a service element can
//! be referenced from both the root element and the service list.

use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::value::MetaValue;

/// Upper occurrence bound of an element
///
/// A declared `maxOccurrences` of `0` means unbounded; the zero never
/// survives construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxOccurrences {
    Bounded(NonZeroU32),
    Unbounded,
}

impl MaxOccurrences {
    /// Normalize a declared bound
    pub fn from_declared(declared: u32) -> Self {
        NonZeroU32::new(declared).map_or(MaxOccurrences::Unbounded, MaxOccurrences::Bounded)
    }

    /// The bound, `None` when unbounded
    pub fn get(self) -> Option<u32> {
        match self {
            MaxOccurrences::Bounded(n) => Some(n.get()),
            MaxOccurrences::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, MaxOccurrences::Unbounded)
    }
}

impl fmt::Display for MaxOccurrences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurrences::Bounded(n) => write!(f, "{}", n),
            MaxOccurrences::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Any node of the schema tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum MetaNode {
    Element(Arc<MetaElement>),
    Attribute(MetaAttribute),
}

impl MetaNode {
    pub fn name(&self) -> &str {
        match self {
            MetaNode::Element(element) => element.name(),
            MetaNode::Attribute(attribute) => attribute.name(),
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            MetaNode::Element(element) => element.comment(),
            MetaNode::Attribute(attribute) => attribute.comment(),
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            MetaNode::Element(element) => element.version(),
            MetaNode::Attribute(attribute) => attribute.version(),
        }
    }

    pub fn as_element(&self) -> Option<&Arc<MetaElement>> {
        match self {
            MetaNode::Element(element) => Some(element),
            MetaNode::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&MetaAttribute> {
        match self {
            MetaNode::Attribute(attribute) => Some(attribute),
            MetaNode::Element(_) => None,
        }
    }
}

impl From<MetaElement> for MetaNode {
    fn from(element: MetaElement) -> Self {
        MetaNode::Element(Arc::new(element))
    }
}

impl From<Arc<MetaElement>> for MetaNode {
    fn from(element: Arc<MetaElement>) -> Self {
        MetaNode::Element(element)
    }
}

impl From<MetaAttribute> for MetaNode {
    fn from(attribute: MetaAttribute) -> Self {
        MetaNode::Attribute(attribute)
    }
}

/// A schema element, or a leaf when it carries a value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaElement {
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<String>,
    pub(crate) min_occurrences: u32,
    pub(crate) max_occurrences: MaxOccurrences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<MetaValue>,
    pub(crate) children: Vec<MetaNode>,
}

impl MetaElement {
    /// Create an element without children; `max_occurrences == 0` means unbounded
    pub fn new(name: impl Into<String>, min_occurrences: u32, max_occurrences: u32) -> Self {
        Self {
            name: name.into(),
            comment: None,
            version: None,
            min_occurrences,
            max_occurrences: MaxOccurrences::from_declared(max_occurrences),
            value: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn min_occurrences(&self) -> u32 {
        self.min_occurrences
    }

    pub fn max_occurrences(&self) -> MaxOccurrences {
        self.max_occurrences
    }

    /// The value of a leaf, `None` for a structural element
    pub fn value(&self) -> Option<&MetaValue> {
        self.value.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }

    /// Children in declaration order
    pub fn children(&self) -> &[MetaNode] {
        &self.children
    }

    /// Nested elements and leaves
    pub fn elements(&self) -> impl Iterator<Item = &Arc<MetaElement>> {
        self.children.iter().filter_map(MetaNode::as_element)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &MetaAttribute> {
        self.children.iter().filter_map(MetaNode::as_attribute)
    }

    /// First nested element or leaf named `name`
    pub fn child_element(&self, name: &str) -> Option<&Arc<MetaElement>> {
        self.elements().find(|element| element.name() == name)
    }

    /// First attribute named `name`
    pub fn attribute(&self, name: &str) -> Option<&MetaAttribute> {
        self.attributes().find(|attribute| attribute.name() == name)
    }

    pub(crate) fn push_child(&mut self, child: impl Into<MetaNode>) {
        self.children.push(child.into());
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "    ".repeat(depth);
        write!(
            f,
            "{}{} '{}' [{}..{}]",
            indent,
            if self.is_leaf() { "Leaf" } else { "Element" },
            self.name,
            self.min_occurrences,
            self.max_occurrences
        )?;
        if let Some(version) = &self.version {
            write!(f, " version={}", version)?;
        }
        if let Some(value) = &self.value {
            write!(f, " {}", value)?;
        }
        writeln!(f)?;
        for child in &self.children {
            match child {
                MetaNode::Element(element) => element.write_tree(f, depth + 1)?,
                MetaNode::Attribute(attribute) => {
                    writeln!(f, "{}    {}", indent, attribute)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for MetaElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// A schema attribute; always exactly one value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaAttribute {
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<String>,
    pub(crate) required: bool,
    pub(crate) value: MetaValue,
}

impl MetaAttribute {
    pub fn new(name: impl Into<String>, required: bool, value: MetaValue) -> Self {
        Self {
            name: name.into(),
            comment: None,
            version: None,
            required,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn value(&self) -> &MetaValue {
        &self.value
    }
}

impl fmt::Display for MetaAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Attribute '{}'{} {}",
            self.name,
            if self.required { " (required)" } else { "" },
            self.value
        )
    }
}
