//! # sift-query
//!
//! Dynamic, client-driven filtering for Sift.
//!
//! This crate provides:
//! - Decoding of filter payloads into ordered [`FilterCriterion`] lists
//! - The predicate compiler that turns criteria into one [`Filter`]
//! - Per-kind coercion of loosely typed literals
//! - The [`Queryable`] seam and an in-memory implementation
//! - The [`EntityQuery`] façade with its authorization gate
//!
//! ## Criteria
//!
//! Criteria are combined by adjacency: a criterion on the same property as
//! the one right before it is OR-ed in, anything else is AND-ed.
//!
//! ```rust
//! use sift_query::{Filter, FilterCriterion, FilterService};
//! use sift_schema::entity;
//!
//! struct Ticket { status: String, priority: i64 }
//!
//! entity! {
//!     Ticket as "Tickets" {
//!         "Status" => status: String,
//!         "Priority" => priority: Int,
//!     }
//! }
//!
//! let filter = FilterService::compile::<Ticket>(&[
//!     FilterCriterion::new("Status", "=", "open"),
//!     FilterCriterion::new("Status", "=", "blocked"),
//!     FilterCriterion::new("Priority", ">=", 3),
//! ])?;
//!
//! assert_eq!(
//!     filter.to_string(),
//!     r#"((Status = "open" OR Status = "blocked") AND Priority >= 3)"#
//! );
//! # Ok::<(), sift_query::QueryError>(())
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`QueryError`] carrying an [`ErrorCode`]:
//!
//! ```rust
//! use sift_query::{ErrorCode, decode_filters};
//!
//! let err = decode_filters(Some("[{\"Property\":1}]")).unwrap_err();
//! assert_eq!(err.code, ErrorCode::MalformedFilter);
//! assert_eq!(err.code.http_status(), 400);
//! ```

pub mod access;
pub mod coerce;
pub mod compiler;
pub mod criteria;
pub mod error;
pub mod facade;
pub mod filter;
pub mod logging;
pub mod operator;
pub mod queryable;

pub use access::{
    AccessGate, AllowAll, Entitlement, GateFn, Principal, RoleEntitlements, TenantId,
};
pub use coerce::{CoerceError, coerce};
pub use compiler::FilterService;
pub use criteria::{Criteria, CriterionValue, FilterCriterion, FilterDecoder, decode_filters};
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult, Suggestion};
pub use facade::EntityQuery;
pub use filter::{FieldName, Filter};
pub use operator::Operator;
pub use queryable::{MemoryQuery, Queryable};

// Re-export logging utilities
pub use logging::{get_log_format, get_log_level, init as init_logging, is_debug_enabled};

// Used by the logging macros.
#[doc(hidden)]
pub use tracing as __tracing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::access::{AccessGate, AllowAll, Entitlement, Principal, RoleEntitlements};
    pub use crate::compiler::FilterService;
    pub use crate::criteria::{CriterionValue, FilterCriterion};
    pub use crate::error::{ErrorCode, QueryError, QueryResult};
    pub use crate::facade::EntityQuery;
    pub use crate::filter::Filter;
    pub use crate::queryable::{MemoryQuery, Queryable};

    pub use sift_schema::{Entity, FieldKind, FieldValue};
}
