//! The predicate compiler.
//!
//! Turns an ordered list of [`FilterCriterion`] into one [`Filter`] over an
//! entity type and applies it to a [`Queryable`].
//!
//! # Combination rule
//!
//! Criteria are folded left to right. Each criterion is compared with the
//! **immediately preceding** criterion only:
//!
//! - same property as the previous criterion: `accumulated OR current`
//! - different property: `accumulated AND current`
//!
//! The accumulator is always one operand, so the grouping depends on order:
//!
//! | criteria | compiled |
//! |---|---|
//! | `S=a, S=b, C=x` | `(S=a OR S=b) AND C=x` |
//! | `S=a, C=x, S=b` | `S=a AND C=x AND S=b` |
//! | `C=x, S=a, S=b` | `(C=x AND S=a) OR S=b` |
//!
//! Repeats of a property that are not adjacent are **not** OR-ed together.
//! Callers that want "any of these values" must send them next to each
//! other. This is existing client-visible behavior; changing it to
//! group-by-property semantics would change results for the last two rows.

use tracing::debug;

use sift_schema::{Entity, FieldDef};

use crate::coerce::coerce;
use crate::criteria::FilterCriterion;
use crate::error::{QueryError, QueryResult};
use crate::filter::Filter;
use crate::operator::Operator;
use crate::queryable::Queryable;

/// Compiles criteria into filters and applies them.
///
/// Stateless; every call builds and discards its own predicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterService;

impl FilterService {
    /// Compile criteria for entity `T`.
    ///
    /// Every criterion is validated before the result is returned; the first
    /// invalid one aborts compilation. An empty list compiles to
    /// [`Filter::None`].
    pub fn compile<T: Entity>(criteria: &[FilterCriterion]) -> QueryResult<Filter> {
        let mut combined = Filter::None;
        let mut previous: Option<&str> = None;

        for (index, criterion) in criteria.iter().enumerate() {
            let individual =
                Self::filter_expression::<T>(criterion).map_err(|e| e.at_index(index))?;

            combined = match previous {
                None => individual,
                Some(prev) if prev == criterion.property => combined.or_else(individual),
                Some(_) => combined.and_then(individual),
            };
            previous = Some(criterion.property.as_str());

            crate::sift_trace!(
                entity = T::NAME,
                index,
                property = %criterion.property,
                operator = %criterion.operator,
                "criterion compiled"
            );
        }

        Ok(combined)
    }

    /// Narrow `query` by `criteria`.
    ///
    /// Absent or empty criteria return the query unchanged without building
    /// a predicate. Otherwise the compiled filter is applied with a single
    /// [`Queryable::filter`] call, or an error is returned and nothing is
    /// filtered.
    pub fn apply_filter<T, Q>(query: &Q, criteria: Option<&[FilterCriterion]>) -> QueryResult<Q>
    where
        T: Entity,
        Q: Queryable<T>,
    {
        let criteria = match criteria {
            None | Some([]) => return Ok(query.clone()),
            Some(criteria) => criteria,
        };

        let filter = Self::compile::<T>(criteria)?;
        debug!(
            entity = T::NAME,
            criteria = criteria.len(),
            filter = %filter,
            "applying compiled filter"
        );
        Ok(query.filter(&filter))
    }

    /// Build the elementary comparison for one criterion.
    pub fn filter_expression<T: Entity>(criterion: &FilterCriterion) -> QueryResult<Filter> {
        let field = resolve_field::<T>(&criterion.property)?;

        let value = coerce(field, &criterion.value).map_err(|e| {
            QueryError::invalid_value(T::NAME, field.name, e.to_string())
                .with_operator(criterion.operator.as_str())
                .with_source(e)
        })?;

        let op = Operator::from_token(&criterion.operator)?;
        if op.is_ordering() && !field.kind.is_orderable() {
            return Err(QueryError::operator_not_applicable(
                T::NAME,
                field.name,
                &criterion.operator,
                field.kind,
            ));
        }

        Ok(Filter::compare(field.name, op, value))
    }
}

fn resolve_field<T: Entity>(property: &str) -> QueryResult<&'static FieldDef> {
    T::field_def(property).ok_or_else(|| {
        let available: Vec<&str> = T::FIELDS.iter().map(|f| f.name).collect();
        QueryError::unknown_property(T::NAME, property, &available)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriterionValue;
    use crate::error::ErrorCode;
    use crate::queryable::MemoryQuery;
    use pretty_assertions::assert_eq;
    use sift_schema::{FieldKind, FieldValue};

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        p: i64,
        q: i64,
        flag: bool,
    }

    impl Entity for Rec {
        const NAME: &'static str = "Rec";
        const FIELDS: &'static [FieldDef] = &[
            FieldDef::new("P", FieldKind::Int),
            FieldDef::new("Q", FieldKind::Int),
            FieldDef::new("Flag", FieldKind::Bool),
        ];

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "P" => Some(FieldValue::Int(self.p)),
                "Q" => Some(FieldValue::Int(self.q)),
                "Flag" => Some(FieldValue::Bool(self.flag)),
                _ => None,
            }
        }
    }

    fn rec(p: i64, q: i64) -> Rec {
        Rec { p, q, flag: false }
    }

    fn eq(prop: &str, v: i64) -> FilterCriterion {
        FilterCriterion::new(prop, "=", v)
    }

    fn leaf(prop: &'static str, v: i64) -> Filter {
        Filter::Equals(prop, FieldValue::Int(v))
    }

    #[test]
    fn test_compile_empty_is_none() {
        assert!(FilterService::compile::<Rec>(&[]).unwrap().is_none());
    }

    #[test]
    fn test_adjacent_same_property_ors() {
        let filter = FilterService::compile::<Rec>(&[eq("P", 1), eq("P", 2), eq("Q", 9)]).unwrap();
        assert_eq!(
            filter,
            Filter::And(vec![Filter::Or(vec![leaf("P", 1), leaf("P", 2)]), leaf("Q", 9)])
        );
    }

    #[test]
    fn test_non_adjacent_same_property_ands() {
        let filter = FilterService::compile::<Rec>(&[eq("P", 1), eq("Q", 9), eq("P", 2)]).unwrap();
        assert_eq!(
            filter,
            Filter::And(vec![leaf("P", 1), leaf("Q", 9), leaf("P", 2)])
        );
    }

    #[test]
    fn test_or_wraps_whole_accumulator() {
        let filter = FilterService::compile::<Rec>(&[eq("Q", 9), eq("P", 1), eq("P", 2)]).unwrap();
        assert_eq!(
            filter,
            Filter::Or(vec![Filter::And(vec![leaf("Q", 9), leaf("P", 1)]), leaf("P", 2)])
        );

        // (Q=9 AND P=1) OR P=2 admits a P=2 record regardless of Q.
        let q = MemoryQuery::from(vec![rec(2, 0), rec(1, 0), rec(1, 9)]);
        let criteria = [eq("Q", 9), eq("P", 1), eq("P", 2)];
        let out = FilterService::apply_filter::<Rec, _>(&q, Some(&criteria[..])).unwrap();
        assert_eq!(out.to_vec(), vec![rec(2, 0), rec(1, 9)]);
    }

    #[test]
    fn test_first_error_aborts() {
        let criteria = [
            eq("P", 1),
            FilterCriterion::new("Nope", "=", 1),
            FilterCriterion::new("P", "contains", 1),
        ];
        let err = FilterService::compile::<Rec>(&criteria).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownProperty);
        assert_eq!(err.context.index, Some(1));
    }

    #[test]
    fn test_property_checked_before_operator() {
        let err = FilterService::compile::<Rec>(&[FilterCriterion::new("Nope", "contains", 1)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownProperty);
    }

    #[test]
    fn test_value_checked_before_operator() {
        let err = FilterService::compile::<Rec>(&[FilterCriterion::new(
            "P",
            "contains",
            "not-a-number",
        )])
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidValue);
        assert_eq!(err.context.operator.as_deref(), Some("contains"));
    }

    #[test]
    fn test_ordering_on_bool_rejected() {
        let err = FilterService::compile::<Rec>(&[FilterCriterion::new("Flag", ">", true)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidValue);
        assert_eq!(err.context.operator.as_deref(), Some(">"));

        assert!(FilterService::compile::<Rec>(&[FilterCriterion::new("Flag", "!=", true)]).is_ok());
    }

    #[test]
    fn test_invalid_value_carries_source() {
        let err = FilterService::compile::<Rec>(&[FilterCriterion::new(
            "P",
            "=",
            CriterionValue::String("not-a-number".into()),
        )])
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidValue);
        assert!(err.source.is_some());
        assert!(err.message.contains("Rec.P"));
    }

    #[test]
    fn test_apply_none_and_empty_are_identity() {
        let q = MemoryQuery::from(vec![rec(1, 1), rec(2, 2)]);
        let out = FilterService::apply_filter::<Rec, _>(&q, None).unwrap();
        assert!(out.same_selection(&q));
        let out = FilterService::apply_filter::<Rec, _>(&q, Some(&[][..])).unwrap();
        assert!(out.same_selection(&q));
    }
}
