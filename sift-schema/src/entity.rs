//! Per-entity field registry.
//!
//! Every entity that can be filtered declares a static table of its fields
//! and an accessor that reads one field by name. Property names from client
//! criteria are resolved against this table, so an unknown name is a plain
//! lookup miss rather than a reflection failure.
//!
//! The [`entity!`](crate::entity!) macro generates both from a field list:
//!
//! ```rust
//! use sift_schema::{entity, Entity, FieldValue};
//!
//! pub struct Author {
//!     pub id: i64,
//!     pub name: String,
//!     pub country: Option<String>,
//! }
//!
//! entity! {
//!     Author as "Author" {
//!         "Id" => id: Int,
//!         "Name" => name: String,
//!         "Country" => country: String nullable,
//!     }
//! }
//!
//! assert_eq!(Author::FIELDS.len(), 3);
//! assert_eq!(Author::field_def("Country").map(|f| f.nullable), Some(true));
//!
//! let author = Author { id: 1, name: "Le Guin".into(), country: None };
//! assert_eq!(author.field("Name"), Some(FieldValue::from("Le Guin")));
//! assert_eq!(author.field("name"), None);
//! ```

use std::collections::HashSet;

use crate::error::{SchemaError, SchemaResult};
use crate::field::FieldDef;
use crate::value::FieldValue;

/// A filterable entity type.
pub trait Entity {
    /// Entity name used for authorization and diagnostics.
    const NAME: &'static str;

    /// All filterable fields.
    const FIELDS: &'static [FieldDef];

    /// Field used by id lookups.
    const ID_FIELD: &'static str = "Id";

    /// Read a field by its property name.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Look up a field definition by exact, case-sensitive name.
    fn field_def(name: &str) -> Option<&'static FieldDef> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

/// Check an entity's field table for duplicates and a usable id field.
pub fn validate_entity<T: Entity>() -> SchemaResult<()> {
    let mut seen = HashSet::with_capacity(T::FIELDS.len());
    for field in T::FIELDS {
        if !seen.insert(field.name) {
            return Err(SchemaError::duplicate_field(T::NAME, field.name));
        }
    }

    if T::field_def(T::ID_FIELD).is_none() {
        return Err(SchemaError::MissingId {
            entity: T::NAME.to_string(),
            field: T::ID_FIELD.to_string(),
        });
    }

    tracing::trace!(entity = T::NAME, fields = T::FIELDS.len(), "entity registry validated");
    Ok(())
}

/// Implement [`Entity`] for a struct from a list of
/// `"Property" => rust_field: Kind [nullable]` entries.
///
/// Each field's Rust type must belong to its declared kind:
///
/// ```compile_fail
/// use sift_schema::entity;
///
/// struct Post {
///     id: i64,
///     title: String,
/// }
///
/// entity! {
///     Post as "Post" {
///         "Id" => id: Int,
///         "Title" => title: Int,
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity {
    (
        $ty:ty as $name:literal {
            $( $prop:literal => $field:ident : $kind:ident $($nullable:ident)? ),* $(,)?
        }
    ) => {
        impl $crate::Entity for $ty {
            const NAME: &'static str = $name;

            const FIELDS: &'static [$crate::FieldDef] = &[
                $(
                    $crate::FieldDef {
                        name: $prop,
                        kind: $crate::FieldKind::$kind,
                        nullable: $crate::__entity_nullable!($($nullable)?),
                    }
                ),*
            ];

            fn field(&self, name: &str) -> ::std::option::Option<$crate::FieldValue> {
                match name {
                    $( $prop => ::std::option::Option::Some(
                        $crate::value::__kind_value::<$crate::value::kinds::$kind, _>(&self.$field)
                    ), )*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __entity_nullable {
    () => {
        false
    };
    (nullable) => {
        true
    };
}
