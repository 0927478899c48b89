//! Explicit coercion of criterion literals into field values.
//!
//! One function per [`FieldKind`]. Each either produces a value of exactly
//! that kind or fails; there is no fallback to a "close enough" kind.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use sift_schema::{FieldDef, FieldKind, FieldValue};

use crate::criteria::CriterionValue;

/// Why a literal could not be coerced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoerceError {
    /// Null literal against a non-nullable field.
    #[error("null is not allowed for a non-nullable {kind} property")]
    NullNotAllowed { kind: FieldKind },

    /// Literal cannot represent a value of the kind.
    #[error("{literal} is not a valid {kind}")]
    Mismatch { kind: FieldKind, literal: String },
}

impl CoerceError {
    fn mismatch(kind: FieldKind, literal: &CriterionValue) -> Self {
        Self::Mismatch {
            kind,
            literal: literal.to_string(),
        }
    }
}

/// Coerce a literal into the kind of `field`.
pub fn coerce(field: &FieldDef, value: &CriterionValue) -> Result<FieldValue, CoerceError> {
    if let CriterionValue::Null = value {
        return if field.nullable {
            Ok(FieldValue::Null)
        } else {
            Err(CoerceError::NullNotAllowed { kind: field.kind })
        };
    }

    let coerced = match field.kind {
        FieldKind::Int => to_int(value).map(FieldValue::Int),
        FieldKind::Float => to_float(value).map(FieldValue::Float),
        FieldKind::Decimal => to_decimal(value).map(FieldValue::Decimal),
        FieldKind::Bool => to_bool(value).map(FieldValue::Bool),
        FieldKind::String => Some(FieldValue::String(to_text(value))),
        FieldKind::DateTime => to_datetime(value).map(FieldValue::DateTime),
        FieldKind::Date => to_date(value).map(FieldValue::Date),
        FieldKind::Uuid => to_uuid(value).map(FieldValue::Uuid),
    };

    coerced.ok_or_else(|| CoerceError::mismatch(field.kind, value))
}

fn to_int(value: &CriterionValue) -> Option<i64> {
    match value {
        CriterionValue::Int(v) => Some(*v),
        CriterionValue::Float(v) => {
            // Only integral floats inside the i64 range; no rounding.
            if v.is_finite() && v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 {
                Some(*v as i64)
            } else {
                None
            }
        }
        CriterionValue::Bool(v) => Some(i64::from(*v)),
        CriterionValue::String(s) => s.trim().parse().ok(),
        CriterionValue::Null => None,
    }
}

fn to_float(value: &CriterionValue) -> Option<f64> {
    match value {
        CriterionValue::Int(v) => Some(*v as f64),
        CriterionValue::Float(v) => Some(*v),
        CriterionValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
        CriterionValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        CriterionValue::Null => None,
    }
}

fn to_decimal(value: &CriterionValue) -> Option<Decimal> {
    match value {
        CriterionValue::Int(v) => Some(Decimal::from(*v)),
        CriterionValue::Float(v) => Decimal::try_from(*v).ok(),
        CriterionValue::Bool(v) => Some(Decimal::from(i64::from(*v))),
        CriterionValue::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        CriterionValue::Null => None,
    }
}

fn to_bool(value: &CriterionValue) -> Option<bool> {
    match value {
        CriterionValue::Bool(v) => Some(*v),
        CriterionValue::Int(v) => Some(*v != 0),
        CriterionValue::Float(v) => Some(*v != 0.0),
        CriterionValue::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        CriterionValue::Null => None,
    }
}

fn to_text(value: &CriterionValue) -> String {
    match value {
        CriterionValue::String(s) => s.clone(),
        CriterionValue::Bool(v) => v.to_string(),
        CriterionValue::Int(v) => v.to_string(),
        CriterionValue::Float(v) => v.to_string(),
        CriterionValue::Null => String::new(),
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

fn to_datetime(value: &CriterionValue) -> Option<DateTime<Utc>> {
    let CriterionValue::String(s) = value else {
        return None;
    };
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn to_date(value: &CriterionValue) -> Option<NaiveDate> {
    let CriterionValue::String(s) = value else {
        return None;
    };
    let s = s.trim();

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

fn to_uuid(value: &CriterionValue) -> Option<Uuid> {
    match value {
        CriterionValue::String(s) => Uuid::parse_str(s.trim()).ok(),
        _ => None,
    }
}
