//! # Sift
//!
//! Generic, client-driven query filtering for typed entity collections.
//!
//! Sift provides:
//! - A static field registry per entity type, declared with [`entity!`]
//! - A JSON filter payload of `(property, operator, value)` criteria
//! - A predicate compiler that combines criteria by adjacency
//! - An entity query façade guarded by an authorization gate
//!
//! ## Quick Start
//!
//! ```rust
//! use sift::prelude::*;
//!
//! #[derive(Debug, Clone)]
//! struct Author { id: i64, name: String, country: String }
//!
//! sift::entity! {
//!     Author as "Authors" {
//!         "Id" => id: Int,
//!         "Name" => name: String,
//!         "Country" => country: String,
//!     }
//! }
//!
//! let authors = MemoryQuery::from(vec![
//!     Author { id: 1, name: "Le Guin".into(), country: "US".into() },
//!     Author { id: 2, name: "Lem".into(), country: "PL".into() },
//!     Author { id: 3, name: "Tokarczuk".into(), country: "PL".into() },
//! ]);
//!
//! let gate = RoleEntitlements::new().grant("acme", "reader", "Authors", Entitlement::Read);
//! let query = EntityQuery::<Author, _>::new(gate);
//! let reader = Principal::new("acme", "bob").with_role("reader");
//!
//! let polish = query.find_many(
//!     &reader,
//!     &authors,
//!     Some(r#"[{"Property":"Country","Operator":"equals","Value":"PL"},
//!              {"Property":"Id","Operator":">","Value":2}]"#),
//! )?;
//! assert_eq!(polish.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(), ["Tokarczuk"]);
//! # Ok::<(), sift::QueryError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Entity registries, values and configuration.
pub mod schema {
    pub use sift_schema::*;
}

/// Criteria decoding, compilation and the query façade.
pub mod query {
    pub use sift_query::*;
}

pub use sift_schema::entity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::entity;
    pub use sift_query::prelude::*;
    pub use sift_schema::SiftConfig;
}

// Re-export key types at the crate root
pub use sift_query::{
    EntityQuery, ErrorCode, Filter, FilterCriterion, FilterService, QueryError, QueryResult,
};
pub use sift_schema::{Entity, FieldKind, FieldValue, SchemaError, SiftConfig};
