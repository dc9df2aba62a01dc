//! Post-insertion mapping
//!
//! Once a column has been written, the store has assigned identifiers to its
//! attributes. [`InsertionMap`] pairs each stored attribute's re-derived key
//! with that identifier so the next column can resolve its parents.

use crate::attribute::ProcessedAttribute;
use crate::key::AttributeKey;
use std::collections::HashMap;

/// Key -> store-assigned identifier
#[derive(Debug, Clone)]
pub struct InsertionMap<Id> {
    ids: HashMap<AttributeKey, Id>,
}

/// How an attribute's parent maps onto stored identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentId<'a, Id> {
    /// No parent key; the attribute is a root
    Root,
    /// Parent has been stored under this identifier
    Resolved(&'a Id),
    /// Parent key has no identifier yet
    Unresolved(&'a AttributeKey),
}

impl<Id> InsertionMap<Id> {
    /// Create empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
        }
    }

    /// Build from stored `(column, value, id)` rows
    pub fn from_stored<S, I>(stored: I) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (usize, S, Id)>,
    {
        let mut map = Self::new();
        for (col_index, value, id) in stored {
            map.record(col_index, value.as_ref(), id);
        }
        map
    }

    /// Record a stored attribute, re-deriving its key from column and value
    ///
    /// Returns the identifier previously recorded for the same key, if any.
    pub fn record(&mut self, col_index: usize, value: &str, id: Id) -> Option<Id> {
        self.ids.insert(AttributeKey::new(col_index, value), id)
    }

    /// Identifier stored for `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &AttributeKey) -> Option<&Id> {
        self.ids.get(key)
    }

    /// True if `key` has an identifier
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &AttributeKey) -> bool {
        self.ids.contains_key(key)
    }

    /// Resolve the stored parent identifier of `attribute`
    #[must_use]
    pub fn parent_id<'a>(&'a self, attribute: &'a ProcessedAttribute) -> ParentId<'a, Id> {
        match attribute.parent_key() {
            None => ParentId::Root,
            Some(parent) => self
                .ids
                .get(parent)
                .map_or(ParentId::Unresolved(parent), ParentId::Resolved),
        }
    }

    /// Number of recorded keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing has been recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<Id> Default for InsertionMap<Id> {
    fn default() -> Self {
        Self::new()
    }
}
