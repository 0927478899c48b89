//! Authorization gate consulted before any filter work.
//!
//! The gate answers one question: may this principal perform this kind of
//! operation on this entity? Denial short-circuits the request before the
//! payload is even decoded.
//!
//! ```rust
//! use sift_query::access::{AccessGate, Entitlement, Principal, RoleEntitlements};
//!
//! let gate = RoleEntitlements::new()
//!     .grant("acme", "librarian", "Books", Entitlement::Read)
//!     .grant("acme", "librarian", "Books", Entitlement::Update);
//!
//! let alice = Principal::new("acme", "alice").with_role("librarian");
//! assert!(gate.is_allowed(&alice, "Books", Entitlement::Read));
//! assert!(!gate.is_allowed(&alice, "Books", Entitlement::Delete));
//!
//! // Grants do not leak across tenants.
//! let mallory = Principal::new("globex", "mallory").with_role("librarian");
//! assert!(!gate.is_allowed(&mallory, "Books", Entitlement::Read));
//! ```

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A unique identifier for a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Create a new tenant ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the tenant ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TenantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<uuid::Uuid> for TenantId {
    fn from(u: uuid::Uuid) -> Self {
        Self::new(u.to_string())
    }
}

/// Kind of operation being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entitlement {
    /// Add new records.
    Create,
    /// List or fetch records.
    Read,
    /// Modify records.
    Update,
    /// Remove records.
    Delete,
}

impl Entitlement {
    /// Get the entitlement name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Read => "Read",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for Entitlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Tenant the caller belongs to.
    pub tenant: TenantId,
    /// User identifier.
    pub user: String,
    /// Roles held within the tenant.
    pub roles: Vec<String>,
}

impl Principal {
    /// Create a principal without roles.
    pub fn new(tenant: impl Into<TenantId>, user: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            user: user.into(),
            roles: Vec::new(),
        }
    }

    /// Add a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

/// Decides whether a principal holds an entitlement on an entity.
pub trait AccessGate {
    /// Return `true` to let the request through.
    fn is_allowed(&self, principal: &Principal, entity: &str, entitlement: Entitlement) -> bool;
}

impl<G: AccessGate + ?Sized> AccessGate for &G {
    fn is_allowed(&self, principal: &Principal, entity: &str, entitlement: Entitlement) -> bool {
        (**self).is_allowed(principal, entity, entitlement)
    }
}

impl<G: AccessGate + ?Sized> AccessGate for std::sync::Arc<G> {
    fn is_allowed(&self, principal: &Principal, entity: &str, entitlement: Entitlement) -> bool {
        (**self).is_allowed(principal, entity, entitlement)
    }
}

/// Gate that lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessGate for AllowAll {
    fn is_allowed(&self, _principal: &Principal, _entity: &str, _entitlement: Entitlement) -> bool {
        true
    }
}

/// Gate backed by a function.
pub struct GateFn<F>(pub F);

impl<F> AccessGate for GateFn<F>
where
    F: Fn(&Principal, &str, Entitlement) -> bool,
{
    fn is_allowed(&self, principal: &Principal, entity: &str, entitlement: Entitlement) -> bool {
        (self.0)(principal, entity, entitlement)
    }
}

type EntityGrants = HashMap<String, HashSet<Entitlement>>;

/// Role-based grants scoped per tenant.
///
/// Keyed tenant, then role, then entity, so checks look up with borrowed
/// names.
#[derive(Debug, Clone, Default)]
pub struct RoleEntitlements {
    grants: HashMap<TenantId, HashMap<String, EntityGrants>>,
}

impl RoleEntitlements {
    /// Create an empty grant table (denies everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `entitlement` on `entity` to `role` within `tenant`.
    pub fn grant(
        mut self,
        tenant: impl Into<TenantId>,
        role: impl Into<String>,
        entity: impl Into<String>,
        entitlement: Entitlement,
    ) -> Self {
        self.grants
            .entry(tenant.into())
            .or_default()
            .entry(role.into())
            .or_default()
            .entry(entity.into())
            .or_default()
            .insert(entitlement);
        self
    }

    /// Grant all four entitlements on `entity` to `role` within `tenant`.
    pub fn grant_all(
        self,
        tenant: impl Into<TenantId>,
        role: impl Into<String>,
        entity: impl Into<String>,
    ) -> Self {
        let tenant = tenant.into();
        let role = role.into();
        let entity = entity.into();
        [
            Entitlement::Create,
            Entitlement::Read,
            Entitlement::Update,
            Entitlement::Delete,
        ]
        .into_iter()
        .fold(self, |table, e| {
            table.grant(tenant.clone(), role.clone(), entity.clone(), e)
        })
    }
}

impl AccessGate for RoleEntitlements {
    fn is_allowed(&self, principal: &Principal, entity: &str, entitlement: Entitlement) -> bool {
        let Some(roles) = self.grants.get(principal.tenant.as_str()) else {
            return false;
        };
        principal.roles.iter().any(|role| {
            roles
                .get(role.as_str())
                .and_then(|entities| entities.get(entity))
                .is_some_and(|granted| granted.contains(&entitlement))
        })
    }
}
