//! Error types for schema loading
//!
//! Any malformed declaration invalidates the whole load, so every parse
//! failure is a single structured value carrying the message and the slash
//! path of the offending schema node.

use thiserror::Error;

/// Broad classification of a [`MetaError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing required field or disallowed nesting
    Structural,
    /// A field is present but not parsable as its declared type
    Format,
    /// A content-type suffix outside the recognized set
    UnknownType,
    /// Schema document absent or syntactically broken
    Resource,
    /// Loader settings could not be read
    Config,
}

/// Main error type for meta-model construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetaError {
    /// Missing required field (`name`, `default`, ...) or a leaf nesting
    /// another leaf or element
    #[error("{message}. Path: '{path}'.")]
    Structural { message: String, path: String },

    /// Numeric or boolean field that does not parse
    #[error("{message}. Path: '{path}'.")]
    Format { message: String, path: String },

    /// Tag suffix that names no known content type
    #[error("Unknown leaf or attribute type specified ({type_name}). Path: '{path}'.")]
    UnknownType { type_name: String, path: String },

    /// Document-level failure (unreadable or not well-formed)
    #[error("Resource error: {0}")]
    Resource(String),

    /// No schema document exists under the resolved resource name
    #[error("Schema resource not found: {0}")]
    NotFound(String),

    /// Loader settings error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MetaError {
    /// Create a structural error for the node at `path`
    pub fn structural(message: impl Into<String>, path: impl Into<String>) -> Self {
        MetaError::Structural {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a format error for the node at `path`
    pub fn format(message: impl Into<String>, path: impl Into<String>) -> Self {
        MetaError::Format {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create an unknown content type error
    pub fn unknown_type(type_name: impl Into<String>, path: impl Into<String>) -> Self {
        MetaError::UnknownType {
            type_name: type_name.into(),
            path: path.into(),
        }
    }

    /// Create a resource error
    pub fn resource(msg: impl Into<String>) -> Self {
        MetaError::Resource(msg.into())
    }

    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetaError::Structural { .. } => ErrorKind::Structural,
            MetaError::Format { .. } => ErrorKind::Format,
            MetaError::UnknownType { .. } => ErrorKind::UnknownType,
            MetaError::Resource(_) | MetaError::NotFound(_) => ErrorKind::Resource,
            MetaError::Config(_) => ErrorKind::Config,
        }
    }

    /// Schema path of the offending node, when the error came from the tree walk
    pub fn path(&self) -> Option<&str> {
        match self {
            MetaError::Structural { path, .. }
            | MetaError::Format { path, .. }
            | MetaError::UnknownType { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Check if this error points at the schema document rather than the host
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Structural | ErrorKind::Format | ErrorKind::UnknownType
        )
    }
}

impl From<std::io::Error> for MetaError {
    fn from(err: std::io::Error) -> Self {
        MetaError::Resource(err.to_string())
    }
}

impl From<roxmltree::Error> for MetaError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        MetaError::Resource(format!(
            "Parse error at line: {} column: {}. {}",
            pos.row, pos.col, err
        ))
    }
}

impl From<toml::de::Error> for MetaError {
    fn from(err: toml::de::Error) -> Self {
        MetaError::Config(format!("TOML error: {}", err))
    }
}

/// Result type alias for meta-model operations
pub type MetaResult<T> = std::result::Result<T, MetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_path() {
        let err = MetaError::structural("No name found", "/splice_meta_config/element");
        assert_eq!(
            err.to_string(),
            "No name found. Path: '/splice_meta_config/element'."
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(MetaError::format("bad", "/a").kind(), ErrorKind::Format);
        assert_eq!(
            MetaError::unknown_type("Colour", "/a").kind(),
            ErrorKind::UnknownType
        );
        assert_eq!(
            MetaError::NotFound("x.xml".into()).kind(),
            ErrorKind::Resource
        );
    }

    #[test]
    fn test_is_schema_error() {
        assert!(MetaError::structural("x", "/a").is_schema_error());
        assert!(!MetaError::resource("x").is_schema_error());
        assert!(!MetaError::Config("x".into()).is_schema_error());
    }

    #[test]
    fn test_path_accessor() {
        assert_eq!(MetaError::format("x", "/a/b").path(), Some("/a/b"));
        assert_eq!(MetaError::resource("x").path(), None);
    }
}
