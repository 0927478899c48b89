//! Compiled filter trees.
//!
//! A [`Filter`] is a predicate over one entity: elementary comparisons
//! between a registered field and a typed constant, joined by AND/OR nodes.
//! Evaluation walks the tree and reads fields through the entity registry.

use std::fmt;

use sift_schema::{Entity, FieldValue};

use crate::operator::Operator;

/// Field name as registered on the entity.
pub type FieldName = &'static str;

/// A predicate over one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// No filter (always true).
    None,

    /// Equals comparison.
    Equals(FieldName, FieldValue),
    /// Not equals comparison.
    NotEquals(FieldName, FieldValue),

    /// Less than comparison.
    Lt(FieldName, FieldValue),
    /// Less than or equal comparison.
    Lte(FieldName, FieldValue),
    /// Greater than comparison.
    Gt(FieldName, FieldValue),
    /// Greater than or equal comparison.
    Gte(FieldName, FieldValue),

    /// Logical AND of multiple filters.
    And(Vec<Filter>),
    /// Logical OR of multiple filters.
    Or(Vec<Filter>),
}

impl Filter {
    /// Build the elementary comparison for an operator.
    pub fn compare(field: FieldName, op: Operator, value: FieldValue) -> Self {
        match op {
            Operator::Equals => Self::Equals(field, value),
            Operator::NotEquals => Self::NotEquals(field, value),
            Operator::GreaterThan => Self::Gt(field, value),
            Operator::GreaterThanOrEqual => Self::Gte(field, value),
            Operator::LessThan => Self::Lt(field, value),
            Operator::LessThanOrEqual => Self::Lte(field, value),
        }
    }

    /// Check if this filter is empty.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Combine with another filter using AND.
    ///
    /// `self` stays a single operand: `(a OR b).and_then(c)` is
    /// `(a OR b) AND c`.
    pub fn and_then(self, other: Filter) -> Self {
        if self.is_none() {
            return other;
        }
        if other.is_none() {
            return self;
        }
        match self {
            Self::And(mut filters) => {
                filters.push(other);
                Self::And(filters)
            }
            _ => Self::And(vec![self, other]),
        }
    }

    /// Combine with another filter using OR.
    ///
    /// `self` stays a single operand: `(a AND b).or_else(c)` is
    /// `(a AND b) OR c`.
    pub fn or_else(self, other: Filter) -> Self {
        if self.is_none() {
            return other;
        }
        if other.is_none() {
            return self;
        }
        match self {
            Self::Or(mut filters) => {
                filters.push(other);
                Self::Or(filters)
            }
            _ => Self::Or(vec![self, other]),
        }
    }

    /// Number of elementary comparisons in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::And(filters) | Self::Or(filters) => filters.iter().map(Self::leaf_count).sum(),
            _ => 1,
        }
    }

    /// Evaluate the predicate against one entity.
    ///
    /// Comparisons follow lifted-null rules: `null = null` holds, `null = x`
    /// does not, `!=` is the negation of `=`, and every ordering comparison
    /// involving null is false.
    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        match self {
            Self::None => true,
            Self::Equals(field, value) => values_equal(&read(entity, field), value),
            Self::NotEquals(field, value) => !values_equal(&read(entity, field), value),
            Self::Lt(field, value) => read(entity, field).compare(value).is_some_and(|o| o.is_lt()),
            Self::Lte(field, value) => read(entity, field).compare(value).is_some_and(|o| o.is_le()),
            Self::Gt(field, value) => read(entity, field).compare(value).is_some_and(|o| o.is_gt()),
            Self::Gte(field, value) => read(entity, field).compare(value).is_some_and(|o| o.is_ge()),
            Self::And(filters) => filters.iter().all(|f| f.matches(entity)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(entity)),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::None
    }
}

#[inline]
fn read<T: Entity>(entity: &T, field: &str) -> FieldValue {
    entity.field(field).unwrap_or(FieldValue::Null)
}

#[inline]
fn values_equal(actual: &FieldValue, expected: &FieldValue) -> bool {
    match (actual, expected) {
        (FieldValue::Null, FieldValue::Null) => true,
        (FieldValue::Null, _) | (_, FieldValue::Null) => false,
        _ => actual.compare(expected).is_some_and(|o| o.is_eq()),
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "TRUE"),
            Self::Equals(col, val) => write!(f, "{} = {}", col, val),
            Self::NotEquals(col, val) => write!(f, "{} != {}", col, val),
            Self::Lt(col, val) => write!(f, "{} < {}", col, val),
            Self::Lte(col, val) => write!(f, "{} <= {}", col, val),
            Self::Gt(col, val) => write!(f, "{} > {}", col, val),
            Self::Gte(col, val) => write!(f, "{} >= {}", col, val),
            Self::And(filters) => write_joined(f, filters, " AND "),
            Self::Or(filters) => write_joined(f, filters, " OR "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, filters: &[Filter], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", filter)?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_schema::{FieldDef, FieldKind};

    struct Row {
        status: &'static str,
        score: Option<i64>,
    }

    impl Entity for Row {
        const NAME: &'static str = "Row";
        const FIELDS: &'static [FieldDef] = &[
            FieldDef::new("Status", FieldKind::String),
            FieldDef::new("Score", FieldKind::Int).nullable(),
        ];

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "Status" => Some(self.status.into()),
                "Score" => Some(self.score.into()),
                _ => None,
            }
        }
    }

    fn row(status: &'static str, score: Option<i64>) -> Row {
        Row { status, score }
    }

    #[test]
    fn test_combinators_drop_none() {
        let a = Filter::Equals("Status", "a".into());
        assert_eq!(Filter::None.and_then(a.clone()), a);
        assert_eq!(a.clone().or_else(Filter::None), a);
        assert!(Filter::None.and_then(Filter::None).is_none());
    }

    #[test]
    fn test_or_else_keeps_and_as_operand() {
        let a = Filter::Equals("Status", "a".into());
        let b = Filter::Gt("Score", FieldValue::Int(1));
        let c = Filter::Equals("Status", "c".into());
        let combined = a.clone().and_then(b.clone()).or_else(c.clone());
        assert_eq!(combined, Filter::Or(vec![Filter::And(vec![a, b]), c]));
    }

    #[test]
    fn test_and_then_flattens_nested_and() {
        let a = Filter::Equals("Status", "a".into());
        let b = Filter::Equals("Status", "b".into());
        let c = Filter::Equals("Status", "c".into());
        let combined = a.clone().and_then(b.clone()).and_then(c.clone());
        assert_eq!(combined, Filter::And(vec![a, b, c]));
        assert_eq!(combined.leaf_count(), 3);
    }

    #[test]
    fn test_matches_comparisons() {
        let r = row("active", Some(10));
        assert!(Filter::Equals("Status", "active".into()).matches(&r));
        assert!(Filter::NotEquals("Status", "closed".into()).matches(&r));
        assert!(Filter::Gt("Score", FieldValue::Int(9)).matches(&r));
        assert!(Filter::Gte("Score", FieldValue::Int(10)).matches(&r));
        assert!(!Filter::Lt("Score", FieldValue::Int(10)).matches(&r));
        assert!(Filter::Lte("Score", FieldValue::Int(10)).matches(&r));
    }

    #[test]
    fn test_matches_lifted_null() {
        let r = row("active", None);
        assert!(Filter::Equals("Score", FieldValue::Null).matches(&r));
        assert!(!Filter::Equals("Score", FieldValue::Int(1)).matches(&r));
        assert!(Filter::NotEquals("Score", FieldValue::Int(1)).matches(&r));
        assert!(!Filter::Gt("Score", FieldValue::Int(1)).matches(&r));
        assert!(!Filter::Lte("Score", FieldValue::Int(1)).matches(&r));

        let scored = row("active", Some(3));
        assert!(!Filter::Equals("Score", FieldValue::Null).matches(&scored));
        assert!(Filter::NotEquals("Score", FieldValue::Null).matches(&scored));
        assert!(!Filter::Gt("Score", FieldValue::Null).matches(&scored));
    }

    #[test]
    fn test_string_ordering_is_lexical() {
        let r = row("beta", None);
        assert!(Filter::Gt("Status", "alpha".into()).matches(&r));
        assert!(Filter::Lt("Status", "gamma".into()).matches(&r));
    }

    #[test]
    fn test_none_matches_everything() {
        assert!(Filter::None.matches(&row("x", None)));
    }

    #[test]
    fn test_display() {
        let filter = Filter::Equals("Status", "a".into())
            .or_else(Filter::Equals("Status", "b".into()))
            .and_then(Filter::Gte("Score", FieldValue::Int(3)));
        assert_eq!(
            filter.to_string(),
            r#"((Status = "a" OR Status = "b") AND Score >= 3)"#
        );
    }
}
