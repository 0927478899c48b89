//! Per-entity query façade.
//!
//! [`EntityQuery`] is what an entity's read endpoint calls: it checks the
//! gate, decodes the raw payload and hands the criteria to the compiler. It
//! holds no per-entity logic; the entity type parameter selects the field
//! registry.
//!
//! ```rust
//! use sift_query::prelude::*;
//! use sift_schema::entity;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Book { id: i64, title: String, price: f64 }
//!
//! entity! {
//!     Book as "Books" {
//!         "Id" => id: Int,
//!         "Title" => title: String,
//!         "Price" => price: Float,
//!     }
//! }
//!
//! let books = MemoryQuery::from(vec![
//!     Book { id: 1, title: "Dune".into(), price: 9.5 },
//!     Book { id: 2, title: "Emma".into(), price: 4.0 },
//! ]);
//!
//! let query = EntityQuery::<Book, _>::new(AllowAll);
//! let who = Principal::new("acme", "alice");
//!
//! let cheap = query
//!     .find_many(&who, &books, Some(r#"[{"Property":"Price","Operator":"<","Value":"5"}]"#))
//!     .unwrap();
//! assert_eq!(cheap.len(), 1);
//!
//! assert_eq!(query.find_by_id(&who, &books, "2").unwrap().map(|b| b.id), Some(2));
//! ```

use std::marker::PhantomData;

use tracing::info;

use sift_schema::{Entity, SiftConfig};

use crate::access::{AccessGate, Entitlement, Principal};
use crate::compiler::FilterService;
use crate::criteria::{CriterionValue, FilterCriterion, FilterDecoder};
use crate::error::{QueryError, QueryResult};
use crate::queryable::Queryable;

/// Read access to one entity type behind an [`AccessGate`].
pub struct EntityQuery<T, G> {
    gate: G,
    decoder: FilterDecoder,
    log_filters: bool,
    _entity: PhantomData<fn() -> T>,
}

impl<T, G> EntityQuery<T, G>
where
    T: Entity,
    G: AccessGate,
{
    /// Create a façade with default limits.
    pub fn new(gate: G) -> Self {
        Self {
            gate,
            decoder: FilterDecoder::default(),
            log_filters: false,
            _entity: PhantomData,
        }
    }

    /// Create a façade using limits and debug settings from configuration.
    pub fn with_config(gate: G, config: &SiftConfig) -> Self {
        Self {
            gate,
            decoder: FilterDecoder::new(config.filter),
            log_filters: config.debug.log_filters,
            _entity: PhantomData,
        }
    }

    /// List the elements of `query` matching the raw `filters` payload.
    ///
    /// The gate runs first; a denied request never reaches the decoder.
    pub fn find_many<Q: Queryable<T>>(
        &self,
        principal: &Principal,
        query: &Q,
        filters: Option<&str>,
    ) -> QueryResult<Q> {
        self.authorize(principal, Entitlement::Read)?;

        let criteria = self.decoder.decode(filters)?;
        if self.log_filters && !criteria.is_empty() {
            info!(
                entity = T::NAME,
                user = %principal.user,
                tenant = %principal.tenant,
                criteria = criteria.len(),
                "filtering"
            );
        }

        FilterService::apply_filter::<T, Q>(query, Some(criteria.as_slice()))
    }

    /// Fetch the first element whose id field equals `id`.
    ///
    /// `id` is coerced to the id field's kind like any criterion value.
    pub fn find_by_id<Q>(
        &self,
        principal: &Principal,
        query: &Q,
        id: impl Into<CriterionValue>,
    ) -> QueryResult<Option<T>>
    where
        Q: Queryable<T>,
        T: Clone,
    {
        self.authorize(principal, Entitlement::Read)?;

        let criterion = FilterCriterion::new(T::ID_FIELD, "=", id);
        let filter = FilterService::filter_expression::<T>(&criterion)?;
        Ok(query.filter(&filter).first())
    }

    /// Run the gate for `entitlement` on this entity.
    pub fn authorize(&self, principal: &Principal, entitlement: Entitlement) -> QueryResult<()> {
        if self.gate.is_allowed(principal, T::NAME, entitlement) {
            Ok(())
        } else {
            crate::sift_debug!(
                entity = T::NAME,
                user = %principal.user,
                entitlement = %entitlement,
                "access denied"
            );
            Err(QueryError::access_denied(T::NAME, entitlement))
        }
    }
}
