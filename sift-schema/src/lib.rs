//! # sift-schema
//!
//! Entity registries and configuration for Sift.
//!
//! This crate provides:
//! - [`FieldKind`] and [`FieldDef`], the static description of a filterable field
//! - [`FieldValue`], the typed value read off an entity or coerced from a criterion
//! - The [`Entity`] trait and the [`entity!`] macro that implements it
//! - Configuration parser for `sift.toml` files
//!
//! ## Example
//!
//! ```rust,no_run
//! use sift_schema::SiftConfig;
//!
//! let config = SiftConfig::from_file("sift.toml")?.with_environment("production")?;
//! println!("max criteria: {}", config.filter.max_criteria);
//! # Ok::<(), sift_schema::SchemaError>(())
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod field;
pub mod value;

pub use config::{DebugConfig, FilterConfig, SiftConfig};
pub use entity::{Entity, validate_entity};
pub use error::{SchemaError, SchemaResult};
pub use field::{FieldDef, FieldKind};
pub use value::{FieldValue, ToFieldValue};
