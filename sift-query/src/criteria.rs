//! Filter criteria and the decoder for client payloads.
//!
//! A payload is a JSON array of criterion objects:
//!
//! ```json
//! [
//!   {"Property": "Status",  "Operator": "equals", "Value": "Active"},
//!   {"Property": "Status",  "Operator": "equals", "Value": "Pending"},
//!   {"Property": "Country", "Operator": "equals", "Value": "US"}
//! ]
//! ```
//!
//! Order is preserved; the compiler groups criteria by adjacency, so the
//! decoder must never reorder or deduplicate.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use sift_schema::FilterConfig;

use crate::error::{QueryError, QueryResult};

/// Ordered criteria decoded from one payload.
pub type Criteria = SmallVec<[FilterCriterion; 4]>;

/// A loosely typed literal as it arrived from the client.
///
/// Coerced to the target field's kind at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    /// Null literal.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// Text literal.
    String(String),
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for CriterionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for CriterionValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for CriterionValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for CriterionValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for CriterionValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for CriterionValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<uuid::Uuid> for CriterionValue {
    fn from(v: uuid::Uuid) -> Self {
        Self::String(v.to_string())
    }
}

/// One `(property, operator, value)` filter unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriterion {
    /// Property name on the target entity (case-sensitive).
    #[serde(
        rename = "Property",
        alias = "PropertyName",
        alias = "property",
        alias = "propertyName"
    )]
    pub property: String,
    /// Operator token, resolved when the filter is compiled.
    #[serde(rename = "Operator", alias = "operator")]
    pub operator: String,
    /// Literal to compare against.
    #[serde(rename = "Value", alias = "value")]
    pub value: CriterionValue,
}

impl FilterCriterion {
    /// Create a new criterion.
    pub fn new(
        property: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<CriterionValue>,
    ) -> Self {
        Self {
            property: property.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Decodes raw payloads into [`Criteria`] within configured limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterDecoder {
    limits: FilterConfig,
}

impl FilterDecoder {
    /// Create a decoder with the given limits.
    pub fn new(limits: FilterConfig) -> Self {
        Self { limits }
    }

    /// Decode a payload.
    ///
    /// An absent, empty or whitespace-only payload decodes to no criteria.
    pub fn decode(&self, payload: Option<&str>) -> QueryResult<Criteria> {
        let payload = match payload.map(str::trim) {
            None | Some("") => return Ok(Criteria::new()),
            Some(p) => p,
        };

        if payload.len() > self.limits.max_payload_bytes {
            return Err(QueryError::malformed_filter(format!(
                "payload is {} bytes, limit is {}",
                payload.len(),
                self.limits.max_payload_bytes
            )));
        }

        let criteria: Criteria = serde_json::from_str(payload).map_err(|e| {
            QueryError::malformed_filter(e.to_string()).with_source(e)
        })?;

        if criteria.len() > self.limits.max_criteria {
            return Err(QueryError::malformed_filter(format!(
                "{} criteria supplied, limit is {}",
                criteria.len(),
                self.limits.max_criteria
            )));
        }

        tracing::trace!(criteria = criteria.len(), "decoded filter payload");
        Ok(criteria)
    }
}

/// Decode a payload with default limits.
pub fn decode_filters(payload: Option<&str>) -> QueryResult<Criteria> {
    FilterDecoder::default().decode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_absent_or_blank_payload_is_empty() {
        assert!(decode_filters(None).unwrap().is_empty());
        assert!(decode_filters(Some("")).unwrap().is_empty());
        assert!(decode_filters(Some("   \n")).unwrap().is_empty());
        assert!(decode_filters(Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn test_decode_preserves_order() {
        let payload = r#"[
            {"Property":"Status","Operator":"equals","Value":"Active"},
            {"Property":"Status","Operator":"equals","Value":"Pending"},
            {"Property":"Country","Operator":"equals","Value":"US"}
        ]"#;
        let criteria = decode_filters(Some(payload)).unwrap();
        let props: Vec<_> = criteria.iter().map(|c| c.property.as_str()).collect();
        assert_eq!(props, ["Status", "Status", "Country"]);
        assert_eq!(criteria[1].value, CriterionValue::String("Pending".into()));
    }

    #[test]
    fn test_decode_scalar_values() {
        let payload = r#"[
            {"Property":"A","Operator":"=","Value":3},
            {"Property":"B","Operator":"=","Value":2.5},
            {"Property":"C","Operator":"=","Value":true},
            {"Property":"D","Operator":"=","Value":null}
        ]"#;
        let criteria = decode_filters(Some(payload)).unwrap();
        assert_eq!(criteria[0].value, CriterionValue::Int(3));
        assert_eq!(criteria[1].value, CriterionValue::Float(2.5));
        assert_eq!(criteria[2].value, CriterionValue::Bool(true));
        assert_eq!(criteria[3].value, CriterionValue::Null);
    }

    #[test]
    fn test_decode_accepts_member_aliases() {
        let payload = r#"[{"propertyName":"Title","operator":"!=","value":"x"}]"#;
        let criteria = decode_filters(Some(payload)).unwrap();
        assert_eq!(criteria[0], FilterCriterion::new("Title", "!=", "x"));
    }

    #[test]
    fn test_operator_is_not_validated_while_decoding() {
        let payload = r#"[{"Property":"Title","Operator":"contains","Value":"x"}]"#;
        let criteria = decode_filters(Some(payload)).unwrap();
        assert_eq!(criteria[0].operator, "contains");
    }

    #[test]
    fn test_malformed_payloads() {
        let cases = [
            "not json",
            r#"{"Property":"A","Operator":"=","Value":1}"#,
            r#"["A"]"#,
            r#"[{"Operator":"=","Value":1}]"#,
            r#"[{"Property":"A","Value":1}]"#,
            r#"[{"Property":"A","Operator":"="}]"#,
            r#"[{"Property":"A","Operator":"=","Value":[1,2]}]"#,
            r#"[{"Property":"A","Operator":"=","Value":{"x":1}}]"#,
        ];
        for payload in cases {
            let err = decode_filters(Some(payload)).unwrap_err();
            assert_eq!(err.code, ErrorCode::MalformedFilter, "payload: {}", payload);
        }
    }

    #[test]
    fn test_limits() {
        let decoder = FilterDecoder::new(FilterConfig {
            max_criteria: 1,
            max_payload_bytes: 1024,
        });
        let two = r#"[{"Property":"A","Operator":"=","Value":1},{"Property":"B","Operator":"=","Value":2}]"#;
        assert_eq!(
            decoder.decode(Some(two)).unwrap_err().code,
            ErrorCode::MalformedFilter
        );

        let tiny = FilterDecoder::new(FilterConfig {
            max_criteria: 8,
            max_payload_bytes: 8,
        });
        assert_eq!(
            tiny.decode(Some(two)).unwrap_err().code,
            ErrorCode::MalformedFilter
        );
    }
}
