//! Error types for entity registries and configuration.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while loading configuration or checking an entity registry.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(sift::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML")]
    #[diagnostic(code(sift::schema::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    #[diagnostic(
        code(sift::schema::config_error),
        help("check the [filter] section of sift.toml")
    )]
    ConfigError { message: String },

    /// Duplicate field in an entity registry.
    #[error("duplicate field `{field}` on entity `{entity}`")]
    #[diagnostic(code(sift::schema::duplicate_field))]
    DuplicateField { entity: String, field: String },

    /// Entity registry without the field used for lookups by id.
    #[error("entity `{entity}` has no `{field}` field")]
    #[diagnostic(code(sift::schema::missing_id))]
    MissingId { entity: String, field: String },
}

impl SchemaError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a duplicate field error.
    pub fn duplicate_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            entity: entity.into(),
            field: field.into(),
        }
    }
}

#[cfg(test)]
#[allow(unused_assignments)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = SchemaError::config("max_criteria must be greater than zero");
        assert_eq!(
            err.to_string(),
            "configuration error: max_criteria must be greater than zero"
        );
    }

    #[test]
    fn test_duplicate_field_display() {
        let err = SchemaError::duplicate_field("Books", "Title");
        assert!(err.to_string().contains("`Title`"));
        assert!(err.to_string().contains("`Books`"));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = SchemaError::config("bad");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("sift::schema::config_error"));
        assert!(err.help().is_some());
    }
}
