//! Error types for filter compilation with actionable messages.
//!
//! Every failure carries:
//! - An error code for programmatic handling
//! - Suggestions for fixing the input
//! - Context about the entity, property and operator involved
//!
//! # Error Codes
//!
//! Error codes follow a pattern: P{category}{number}
//! - 1xxx: Filter input errors (malformed payload, unknown property, ...)
//! - 3xxx: Access errors
//!
//! All codes are client errors: they are a pure function of the request and
//! retrying cannot change the outcome.
//!
//! ```rust
//! use sift_query::{QueryError, ErrorCode};
//!
//! let err = QueryError::unsupported_operator("contains");
//! assert_eq!(err.code, ErrorCode::UnsupportedOperator);
//! assert!(err.to_string().contains("contains"));
//! assert_eq!(err.code.http_status(), 400);
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for filter operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Filter input errors (1xxx)
    /// Payload is not well-formed or a criterion is missing a member (P1001).
    MalformedFilter = 1001,
    /// Criterion names a property the entity does not have (P1002).
    UnknownProperty = 1002,
    /// Criterion value cannot be coerced to the property's kind (P1003).
    InvalidValue = 1003,
    /// Operator token is not in the operator table (P1004).
    UnsupportedOperator = 1004,

    // Access errors (3xxx)
    /// The authorization gate denied the request (P3001).
    AccessDenied = 3001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "P1001").
    pub fn code(&self) -> String {
        format!("P{}", *self as u16)
    }

    /// HTTP status a boundary should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::AccessDenied => 403,
            _ => 400,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Suggestion for fixing an error.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggestion text.
    pub text: String,
    /// Optional payload example.
    pub code: Option<String>,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: None,
        }
    }

    /// Add a payload example.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The entity being filtered.
    pub entity: Option<String>,
    /// The property involved.
    pub property: Option<String>,
    /// The operator token involved.
    pub operator: Option<String>,
    /// Position of the offending criterion in the payload.
    pub index: Option<usize>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<Suggestion>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur while decoding, compiling or applying a filter.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(suggestion));
        self
    }

    /// Add a suggestion with a payload example.
    pub fn with_code_suggestion(mut self, text: impl Into<String>, code: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(text).with_code(code));
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the entity.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.context.entity = Some(entity.into());
        self
    }

    /// Set the property.
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.context.property = Some(property.into());
        self
    }

    /// Set the operator token.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.context.operator = Some(operator.into());
        self
    }

    /// Set the criterion position.
    pub fn at_index(mut self, index: usize) -> Self {
        self.context.index = Some(index);
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create a malformed filter error.
    pub fn malformed_filter(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MalformedFilter,
            format!("Malformed filter: {}", detail.into()),
        )
        .with_code_suggestion(
            "Send a JSON array of criteria objects",
            r#"[{"Property":"Status","Operator":"equals","Value":"Active"}]"#,
        )
    }

    /// Create an unknown property error.
    pub fn unknown_property(entity: &str, property: &str, available: &[&str]) -> Self {
        let mut err = Self::new(
            ErrorCode::UnknownProperty,
            format!("Property `{}` does not exist on {}", property, entity),
        )
        .with_entity(entity)
        .with_property(property);

        if let Some(close) = available.iter().find(|name| name.eq_ignore_ascii_case(property)) {
            err = err.with_suggestion(format!(
                "Property names are case-sensitive; did you mean `{}`?",
                close
            ));
        }
        err.with_help(format!("Available properties: {}", available.join(", ")))
    }

    /// Create an invalid value error.
    pub fn invalid_value(entity: &str, property: &str, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidValue,
            format!("Invalid value for {}.{}: {}", entity, property, detail.into()),
        )
        .with_entity(entity)
        .with_property(property)
    }

    /// Create an error for an ordering operator on a kind without an order.
    pub fn operator_not_applicable(
        entity: &str,
        property: &str,
        operator: &str,
        kind: impl fmt::Display,
    ) -> Self {
        Self::new(
            ErrorCode::InvalidValue,
            format!(
                "Operator `{}` cannot be applied to {} property {}.{}",
                operator, kind, entity, property
            ),
        )
        .with_entity(entity)
        .with_property(property)
        .with_operator(operator)
        .with_suggestion("Use `equals` or `notequals` for this property")
    }

    /// Create an unsupported operator error.
    pub fn unsupported_operator(token: &str) -> Self {
        Self::new(
            ErrorCode::UnsupportedOperator,
            format!("Operator `{}` is not supported", token),
        )
        .with_operator(token)
        .with_help(
            "Supported operators: equals (=), notequals (!=), greaterthan (>), \
             greaterthanorequal (>=), lessthan (<), lessthanorequal (<=)",
        )
    }

    /// Create an access denied error.
    pub fn access_denied(entity: &str, entitlement: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::AccessDenied,
            format!("Missing {} entitlement on {}", entitlement, entity),
        )
        .with_entity(entity)
    }

    // ============== Error Type Checks ==============

    /// Whether the failure is caused by client input or identity.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::MalformedFilter
                | ErrorCode::UnknownProperty
                | ErrorCode::InvalidValue
                | ErrorCode::UnsupportedOperator
                | ErrorCode::AccessDenied
        )
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Render the error with its suggestions and help, one item per line.
    pub fn display_full(&self) -> String {
        let mut out = self.to_string();
        for suggestion in &self.context.suggestions {
            out.push_str("\n  suggestion: ");
            out.push_str(&suggestion.text);
            if let Some(code) = &suggestion.code {
                out.push_str("\n    ");
                out.push_str(code);
            }
        }
        if let Some(help) = &self.context.help {
            out.push_str("\n  help: ");
            out.push_str(help);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::MalformedFilter.code(), "P1001");
        assert_eq!(ErrorCode::AccessDenied.code(), "P3001");
        assert_eq!(ErrorCode::UnknownProperty.to_string(), "P1002");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::InvalidValue.http_status(), 400);
        assert_eq!(ErrorCode::AccessDenied.http_status(), 403);
    }

    #[test]
    fn test_unknown_property_suggests_case_fix() {
        let err = QueryError::unknown_property("Books", "title", &["Id", "Title"]);
        assert_eq!(err.code, ErrorCode::UnknownProperty);
        assert_eq!(err.context.property.as_deref(), Some("title"));
        assert!(err.context.suggestions[0].text.contains("`Title`"));
        assert!(err.context.help.as_deref().unwrap().contains("Id, Title"));
    }

    #[test]
    fn test_unsupported_operator_names_token() {
        let err = QueryError::unsupported_operator("contains");
        assert_eq!(err.to_string(), "[P1004] Operator `contains` is not supported");
        assert_eq!(err.context.operator.as_deref(), Some("contains"));
    }

    #[test]
    fn test_all_codes_are_client_errors() {
        let errors = [
            QueryError::malformed_filter("x"),
            QueryError::unknown_property("E", "p", &[]),
            QueryError::invalid_value("E", "p", "x"),
            QueryError::unsupported_operator("~"),
            QueryError::access_denied("E", "Read"),
        ];
        for err in errors {
            assert!(err.is_client_error());
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_display_full() {
        let err = QueryError::malformed_filter("expected an array");
        let full = err.display_full();
        assert!(full.starts_with("[P1001] Malformed filter: expected an array"));
        assert!(full.contains("suggestion: Send a JSON array"));
    }
}
