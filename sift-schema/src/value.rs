//! Typed runtime values read off entities and used as comparison constants.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Decimal value.
    Decimal(Decimal),
    /// String value.
    String(String),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
    /// Calendar date.
    Date(NaiveDate),
    /// UUID value.
    Uuid(Uuid),
}

impl FieldValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Compare two non-null values of the same kind.
    ///
    /// Returns `None` when either side is null, the kinds differ, or a float
    /// comparison involves NaN.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(b)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Date(v) => write!(f, "{}", v),
            Self::Uuid(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// Read a struct field as a [`FieldValue`] without consuming it.
///
/// Implemented for every Rust type an [`entity!`](crate::entity!) field may have.
pub trait ToFieldValue {
    /// Convert a borrowed value.
    fn to_field_value(&self) -> FieldValue;
}

macro_rules! impl_to_field_value_copy {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToFieldValue for $ty {
                #[inline]
                fn to_field_value(&self) -> FieldValue {
                    FieldValue::from(*self)
                }
            }
        )*
    };
}

impl_to_field_value_copy!(bool, i32, i64, f64, Decimal, DateTime<Utc>, NaiveDate, Uuid);

impl ToFieldValue for String {
    #[inline]
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl ToFieldValue for &str {
    #[inline]
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String((*self).to_string())
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    #[inline]
    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(v) => v.to_field_value(),
            None => FieldValue::Null,
        }
    }
}

/// Marker types naming each [`FieldKind`](crate::FieldKind) at the type level.
///
/// `entity!` uses these to check that a declared kind matches the Rust type
/// of the field it reads.
pub mod kinds {
    /// `FieldKind::Int`
    pub struct Int;
    /// `FieldKind::Float`
    pub struct Float;
    /// `FieldKind::Decimal`
    pub struct Decimal;
    /// `FieldKind::Bool`
    pub struct Bool;
    /// `FieldKind::String`
    pub struct String;
    /// `FieldKind::DateTime`
    pub struct DateTime;
    /// `FieldKind::Date`
    pub struct Date;
    /// `FieldKind::Uuid`
    pub struct Uuid;
}

/// Rust types whose values belong to the field kind `K`.
pub trait OfKind<K>: ToFieldValue {}

macro_rules! impl_of_kind {
    ($($kind:ident => $($ty:ty),+;)*) => {
        $($(impl OfKind<kinds::$kind> for $ty {})+)*
    };
}

impl_of_kind! {
    Int => i32, i64;
    Float => f64;
    Decimal => Decimal;
    Bool => bool;
    String => String, &str;
    DateTime => DateTime<Utc>;
    Date => NaiveDate;
    Uuid => Uuid;
}

impl<K, T: OfKind<K>> OfKind<K> for Option<T> {}

#[doc(hidden)]
#[inline]
pub fn __kind_value<K, V: OfKind<K>>(value: &V) -> FieldValue {
    value.to_field_value()
}
