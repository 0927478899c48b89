//! Comparison operators and the token table clients use to name them.

use std::fmt;

use crate::error::{QueryError, QueryResult};

/// An elementary comparison between a field and a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `field == value`
    Equals,
    /// `field != value`
    NotEquals,
    /// `field > value`
    GreaterThan,
    /// `field >= value`
    GreaterThanOrEqual,
    /// `field < value`
    LessThan,
    /// `field <= value`
    LessThanOrEqual,
}

/// Accepted tokens, matched case-insensitively.
const OPERATOR_TABLE: &[(&str, Operator)] = &[
    ("equals", Operator::Equals),
    ("=", Operator::Equals),
    ("notequals", Operator::NotEquals),
    ("!=", Operator::NotEquals),
    ("greaterthan", Operator::GreaterThan),
    (">", Operator::GreaterThan),
    ("greaterthanorequal", Operator::GreaterThanOrEqual),
    (">=", Operator::GreaterThanOrEqual),
    ("lessthan", Operator::LessThan),
    ("<", Operator::LessThan),
    ("lessthanorequal", Operator::LessThanOrEqual),
    ("<=", Operator::LessThanOrEqual),
];

impl Operator {
    /// Resolve a client token.
    pub fn from_token(token: &str) -> QueryResult<Self> {
        OPERATOR_TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, op)| *op)
            .ok_or_else(|| QueryError::unsupported_operator(token))
    }

    /// Whether the operator needs an ordered kind.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Self::Equals | Self::NotEquals)
    }

    /// Symbol used when rendering a compiled filter.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
