//! Error types for the metaconfig CLI

use metaconfig_core::{ErrorKind, MetaError};
use thiserror::Error;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Schema document could not be found or read
    #[error("File error: {0}")]
    FileError(String),

    /// Schema document was read but is not a valid schema
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Output could not be serialized
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CliError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CliError::InvalidInput(_) | CliError::FileError(_) | CliError::SchemaError(_)
        )
    }
}

impl From<MetaError> for CliError {
    fn from(err: MetaError) -> Self {
        match err.kind() {
            ErrorKind::Structural | ErrorKind::Format | ErrorKind::UnknownType => {
                CliError::SchemaError(err.to_string())
            }
            ErrorKind::Resource => CliError::FileError(err.to_string()),
            ErrorKind::Config => CliError::InvalidInput(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::SerializationError(format!("YAML error: {}", err))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::invalid_input("bad size");
        assert_eq!(err.to_string(), "Invalid input: bad size");
    }

    #[test]
    fn test_meta_error_conversion() {
        let schema: CliError = MetaError::structural("No name found", "/a/element").into();
        assert!(matches!(schema, CliError::SchemaError(_)));
        assert!(schema.to_string().contains("Path: '/a/element'"));

        let missing: CliError = MetaError::NotFound("splice_metaconfig_6.1.xml".into()).into();
        assert!(matches!(missing, CliError::FileError(_)));

        let settings: CliError = MetaError::Config("Search path is empty".into()).into();
        assert!(matches!(settings, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_is_user_error() {
        assert!(CliError::SchemaError("x".into()).is_user_error());
        assert!(!CliError::SerializationError("x".into()).is_user_error());
        assert!(!CliError::InternalError("x".into()).is_user_error());
    }
}
