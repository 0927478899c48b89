//! Field kinds and field definitions for entity registries.

use serde::{Deserialize, Serialize};

/// Semantic type of an entity field.
///
/// Criterion values are coerced into the kind of the field they target
/// before a comparison is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Exact decimal.
    Decimal,
    /// Boolean flag.
    Bool,
    /// Text.
    String,
    /// Date and time in UTC.
    DateTime,
    /// Calendar date without time.
    Date,
    /// UUID / GUID.
    Uuid,
}

impl FieldKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Decimal => "Decimal",
            Self::Bool => "Bool",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Date => "Date",
            Self::Uuid => "Uuid",
        }
    }

    /// Whether `<`, `<=`, `>` and `>=` are meaningful for this kind.
    pub fn is_orderable(&self) -> bool {
        !matches!(self, Self::Bool | Self::Uuid)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A filterable field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Property name as clients spell it (case-sensitive).
    pub name: &'static str,
    /// Semantic kind.
    pub kind: FieldKind,
    /// Whether the field may hold null.
    pub nullable: bool,
}

impl FieldDef {
    /// Create a non-nullable field definition.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    /// Mark the field as nullable.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}
