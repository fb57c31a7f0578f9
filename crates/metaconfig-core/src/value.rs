//! Typed leaf and attribute values
//!
//! A declaration such as
//!
//! ```xml
//! <leafInt name="Port" minOccurrences="1" maxOccurrences="1">
//!     <minimum>1</minimum>
//!     <maximum>65535</maximum>
//!     <default>7400</default>
//! </leafInt>
//! ```
//!
//! becomes one [`MetaValue`] variant. The tag suffix (`Int` here) selects the
//! [`ContentType`], and each content type maps to exactly one constructor.
//! Absent `minimum`/`maximum` fall back to the natural range of the type; an
//! absent `default` is always an error.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::document::DocumentElement;
use crate::error::{MetaError, MetaResult};
use crate::size;

/// Kind of value a leaf or attribute holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Enum,
    Size,
}

impl ContentType {
    /// Every content type, in declaration order
    pub const ALL: [ContentType; 8] = [
        ContentType::Int,
        ContentType::Long,
        ContentType::Float,
        ContentType::Double,
        ContentType::Boolean,
        ContentType::String,
        ContentType::Enum,
        ContentType::Size,
    ];

    /// Resolve a tag suffix, case-insensitively (`"INT"`, `"Int"`, `"int"`)
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(suffix))
    }

    /// Canonical suffix spelling
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Int => "Int",
            ContentType::Long => "Long",
            ContentType::Float => "Float",
            ContentType::Double => "Double",
            ContentType::Boolean => "Boolean",
            ContentType::String => "String",
            ContentType::Enum => "Enum",
            ContentType::Size => "Size",
        }
    }

    fn constructor(self) -> fn(&DocumentElement) -> MetaResult<MetaValue> {
        match self {
            ContentType::Int => parse_int,
            ContentType::Long => parse_long,
            ContentType::Float => parse_float,
            ContentType::Double => parse_double,
            ContentType::Boolean => parse_boolean,
            ContentType::String => parse_string,
            ContentType::Enum => parse_enum,
            ContentType::Size => parse_size,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_suffix(s).ok_or_else(|| format!("Unknown content type: {}", s))
    }
}

/// The typed value of a leaf or attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetaValue {
    Int { default: i32, min: i32, max: i32 },
    Long { default: i64, min: i64, max: i64 },
    /// `min` defaults to the smallest positive float, not to a negative bound
    Float { default: f32, min: f32, max: f32 },
    /// `min` defaults to the smallest positive double, not to a negative bound
    Double { default: f64, min: f64, max: f64 },
    /// Byte counts after size-literal conversion
    Size { default: i64, min: i64, max: i64 },
    Boolean { default: bool },
    String {
        default: String,
        #[serde(rename = "maxLength")]
        max_length: u32,
    },
    /// `values` keeps declaration order and may contain duplicates
    Enum { default: String, values: Vec<String> },
}

impl MetaValue {
    /// Content type of this value
    pub fn content_type(&self) -> ContentType {
        match self {
            MetaValue::Int { .. } => ContentType::Int,
            MetaValue::Long { .. } => ContentType::Long,
            MetaValue::Float { .. } => ContentType::Float,
            MetaValue::Double { .. } => ContentType::Double,
            MetaValue::Size { .. } => ContentType::Size,
            MetaValue::Boolean { .. } => ContentType::Boolean,
            MetaValue::String { .. } => ContentType::String,
            MetaValue::Enum { .. } => ContentType::Enum,
        }
    }

    /// Default rendered as text
    pub fn default_text(&self) -> String {
        match self {
            MetaValue::Int { default, .. } => default.to_string(),
            MetaValue::Long { default, .. } | MetaValue::Size { default, .. } => {
                default.to_string()
            }
            MetaValue::Float { default, .. } => default.to_string(),
            MetaValue::Double { default, .. } => default.to_string(),
            MetaValue::Boolean { default } => default.to_string(),
            MetaValue::String { default, .. } | MetaValue::Enum { default, .. } => {
                default.clone()
            }
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int { default, min, max } => {
                write!(f, "Int default={} range=[{}, {}]", default, min, max)
            }
            MetaValue::Long { default, min, max } => {
                write!(f, "Long default={} range=[{}, {}]", default, min, max)
            }
            MetaValue::Float { default, min, max } => {
                write!(f, "Float default={} range=[{:e}, {:e}]", default, min, max)
            }
            MetaValue::Double { default, min, max } => {
                write!(f, "Double default={} range=[{:e}, {:e}]", default, min, max)
            }
            MetaValue::Size { default, min, max } => {
                write!(f, "Size default={} range=[{}, {}]", default, min, max)
            }
            MetaValue::Boolean { default } => write!(f, "Boolean default={}", default),
            MetaValue::String {
                default,
                max_length,
            } => write!(f, "String default='{}' maxLength={}", default, max_length),
            MetaValue::Enum { default, values } => {
                write!(f, "Enum default='{}' values=[{}]", default, values.join(", "))
            }
        }
    }
}

/// Build the value declared by `element`, for an already resolved content type
pub fn parse_value(element: &DocumentElement, content_type: ContentType) -> MetaResult<MetaValue> {
    (content_type.constructor())(element)
}

/// Resolve the suffix of a type-parameterized tag (`leafEnum` → `Enum`)
///
/// An unknown suffix is reported through the log as well as returned.
pub fn resolve_content_type(element: &DocumentElement, suffix: &str) -> MetaResult<ContentType> {
    ContentType::from_suffix(suffix).ok_or_else(|| {
        tracing::error!(
            type_name = suffix,
            path = element.path(),
            "Unknown leaf or attribute type specified"
        );
        MetaError::unknown_type(suffix, element.path())
    })
}

/// `minimum`/`maximum`/`default` children of a numeric declaration
struct Bounded<T> {
    minimum: T,
    maximum: T,
    default: Option<T>,
}

fn scan_bounded<T>(
    element: &DocumentElement,
    minimum: T,
    maximum: T,
    parse: impl Fn(&str) -> Option<T>,
) -> MetaResult<Bounded<T>> {
    let mut decl = Bounded {
        minimum,
        maximum,
        default: None,
    };
    for child in element.child_elements() {
        let tag = child.name();
        if !matches!(tag, "minimum" | "maximum" | "default") {
            continue;
        }
        let text = child_text(element, child)?;
        let parsed = parse(&text).ok_or_else(|| invalid_value(element, tag))?;
        match tag {
            "minimum" => decl.minimum = parsed,
            "maximum" => decl.maximum = parsed,
            _ => decl.default = Some(parsed),
        }
    }
    Ok(decl)
}

fn parse_int(element: &DocumentElement) -> MetaResult<MetaValue> {
    let decl = scan_bounded(element, i32::MIN, i32::MAX, |s| s.trim().parse().ok())?;
    Ok(MetaValue::Int {
        default: require_default(element, ContentType::Int, decl.default)?,
        min: decl.minimum,
        max: decl.maximum,
    })
}

fn parse_long(element: &DocumentElement) -> MetaResult<MetaValue> {
    let decl = scan_bounded(element, i64::MIN, i64::MAX, |s| s.trim().parse().ok())?;
    Ok(MetaValue::Long {
        default: require_default(element, ContentType::Long, decl.default)?,
        min: decl.minimum,
        max: decl.maximum,
    })
}

fn parse_float(element: &DocumentElement) -> MetaResult<MetaValue> {
    let decl = scan_bounded(element, f32::MIN_POSITIVE, f32::MAX, |s| {
        s.trim().parse().ok()
    })?;
    Ok(MetaValue::Float {
        default: require_default(element, ContentType::Float, decl.default)?,
        min: decl.minimum,
        max: decl.maximum,
    })
}

fn parse_double(element: &DocumentElement) -> MetaResult<MetaValue> {
    let decl = scan_bounded(element, f64::MIN_POSITIVE, f64::MAX, |s| {
        s.trim().parse().ok()
    })?;
    Ok(MetaValue::Double {
        default: require_default(element, ContentType::Double, decl.default)?,
        min: decl.minimum,
        max: decl.maximum,
    })
}

fn parse_size(element: &DocumentElement) -> MetaResult<MetaValue> {
    // Size text is not trimmed: a trailing blank after the unit voids the literal.
    let decl = scan_bounded(element, i64::MIN, i64::MAX, |s| size::to_bytes(s).ok())?;
    Ok(MetaValue::Size {
        default: require_default(element, ContentType::Size, decl.default)?,
        min: decl.minimum,
        max: decl.maximum,
    })
}

fn parse_boolean(element: &DocumentElement) -> MetaResult<MetaValue> {
    let mut default = None;
    for child in element.child_elements().filter(|c| c.name() == "default") {
        let text = child_text(element, child)?;
        default = Some(parse_bool(text.trim()).ok_or_else(|| invalid_value(element, "default"))?);
    }
    Ok(MetaValue::Boolean {
        default: require_default(element, ContentType::Boolean, default)?,
    })
}

fn parse_string(element: &DocumentElement) -> MetaResult<MetaValue> {
    let mut default = None;
    let mut max_length = None;
    for child in element.child_elements() {
        match child.name() {
            "maxLength" => {
                let text = child_text(element, child)?;
                max_length = Some(
                    text.trim()
                        .parse::<u32>()
                        .map_err(|_| invalid_value(element, "maxLength"))?,
                );
            }
            // `<default/>` is an explicit empty string
            "default" => default = Some(child.text().unwrap_or_default()),
            _ => {}
        }
    }
    let default = require_default(element, ContentType::String, default)?;
    let max_length = max_length.ok_or_else(|| {
        MetaError::structural(
            "Element 'maxLength' not found for contentType 'STRING'",
            element.path(),
        )
    })?;
    Ok(MetaValue::String {
        default,
        max_length,
    })
}

fn parse_enum(element: &DocumentElement) -> MetaResult<MetaValue> {
    let mut default = None;
    let mut values = Vec::new();
    for child in element.child_elements() {
        match child.name() {
            "value" => values.push(child_text(element, child)?),
            "default" => default = Some(child_text(element, child)?),
            _ => {}
        }
    }
    Ok(MetaValue::Enum {
        default: require_default(element, ContentType::Enum, default)?,
        values,
    })
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn child_text(element: &DocumentElement, child: &DocumentElement) -> MetaResult<String> {
    child.text().ok_or_else(|| invalid_value(element, child.name()))
}

fn invalid_value(element: &DocumentElement, tag: &str) -> MetaError {
    MetaError::format(
        format!("Invalid value of element '{}' found", tag),
        element.path(),
    )
}

fn require_default<T>(
    element: &DocumentElement,
    content_type: ContentType,
    default: Option<T>,
) -> MetaResult<T> {
    default.ok_or_else(|| {
        MetaError::structural(
            format!(
                "Element 'default' not found for contentType '{}'",
                content_type.as_str().to_uppercase()
            ),
            element.path(),
        )
    })
}
