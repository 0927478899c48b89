//! Collections a compiled filter can narrow.
//!
//! [`Queryable`] is the seam to the storage layer: it accepts one predicate
//! and hands back a new handle of the same element type. How the predicate
//! executes (in memory, translated by a store, ...) is the implementor's
//! concern. [`MemoryQuery`] is the in-memory implementation.

use std::sync::Arc;

use sift_schema::Entity;

use crate::filter::Filter;

/// A typed collection that can be narrowed by a [`Filter`].
pub trait Queryable<T: Entity>: Clone {
    /// Narrow the collection, returning a new handle.
    ///
    /// The receiver is left untouched.
    fn filter(&self, predicate: &Filter) -> Self;

    /// First element of the collection, if any.
    fn first(&self) -> Option<T>
    where
        T: Clone;
}

/// A view over a shared, immutable slice of entities.
///
/// Cloning and narrowing never copy the entities; a narrowed view only
/// stores the positions it selected.
#[derive(Debug)]
pub struct MemoryQuery<T> {
    source: Arc<[T]>,
    selection: Option<Arc<[usize]>>,
}

impl<T> Clone for MemoryQuery<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            selection: self.selection.clone(),
        }
    }
}

impl<T> MemoryQuery<T> {
    /// Create a view over all of `items`.
    pub fn new(items: impl Into<Arc<[T]>>) -> Self {
        Self {
            source: items.into(),
            selection: None,
        }
    }

    /// Iterate the selected elements in source order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (all, selected) = match &self.selection {
            None => (Some(self.source.iter()), None),
            Some(indices) => (None, Some(indices.iter().map(|&i| &self.source[i]))),
        };
        all.into_iter().flatten().chain(selected.into_iter().flatten())
    }

    /// Number of selected elements.
    pub fn len(&self) -> usize {
        match &self.selection {
            None => self.source.len(),
            Some(indices) => indices.len(),
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether both views select the same elements of the same source.
    pub fn same_selection(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source, &other.source) && self.positions().eq(other.positions())
    }

    fn positions(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match &self.selection {
            None => Box::new(0..self.source.len()),
            Some(indices) => Box::new(indices.iter().copied()),
        }
    }
}

impl<T: Clone> MemoryQuery<T> {
    /// Copy the selected elements out.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> From<Vec<T>> for MemoryQuery<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Entity> Queryable<T> for MemoryQuery<T> {
    fn filter(&self, predicate: &Filter) -> Self {
        let selected: Arc<[usize]> = self
            .positions()
            .filter(|&i| predicate.matches(&self.source[i]))
            .collect();

        Self {
            source: Arc::clone(&self.source),
            selection: Some(selected),
        }
    }

    fn first(&self) -> Option<T>
    where
        T: Clone,
    {
        self.iter().next().cloned()
    }
}
