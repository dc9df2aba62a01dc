//! Persistence seam for framework attributes
//!
//! The hierarchy builder never talks to a database. Callers implement
//! [`AttributeStore`] over whatever storage they use; [`InMemoryStore`]
//! backs tests and dry runs.

use kpi_hierarchy::AttributeKey;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// An attribute about to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttribute<Id> {
    /// Column header
    pub name: String,
    /// Cell value as first seen
    pub value: String,
    /// Row of the first occurrence
    pub row_index: usize,
    /// Grid column
    pub col_index: usize,
    /// Identifier of the already-stored parent, `None` for roots
    pub parent_id: Option<Id>,
}

/// An attribute as the store recorded it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAttribute<Id> {
    /// Store-assigned identifier
    pub id: Id,
    /// Column header
    pub name: String,
    /// Value as stored
    pub value: String,
    /// Grid column
    pub col_index: usize,
    /// Identifier of the parent, `None` for roots
    pub parent_id: Option<Id>,
}

/// Somewhere attributes can be written one at a time
pub trait AttributeStore {
    /// Opaque identifier assigned on insert
    type Id: Clone + std::fmt::Debug;

    /// Store failure
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write one attribute and return what was stored
    ///
    /// # Errors
    /// Implementation specific.
    fn insert(
        &mut self,
        attribute: NewAttribute<Self::Id>,
    ) -> Result<StoredAttribute<Self::Id>, Self::Error>;
}

/// Errors raised by [`InMemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Unique `(column, normalized value)` constraint
    #[error("attribute '{0}' already exists")]
    Duplicate(AttributeKey),

    /// Parent reference to an unknown identifier
    #[error("parent {0} does not exist")]
    UnknownParent(Uuid),
}

/// Vec-backed store enforcing key uniqueness and parent existence
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: Vec<StoredAttribute<Uuid>>,
    by_id: HashMap<Uuid, usize>,
    by_key: HashMap<AttributeKey, Uuid>,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored rows in insertion order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[StoredAttribute<Uuid>] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&StoredAttribute<Uuid>> {
        self.by_id.get(&id).map(|&idx| &self.rows[idx])
    }

    #[must_use]
    pub fn find(&self, key: &AttributeKey) -> Option<&StoredAttribute<Uuid>> {
        self.by_key.get(key).and_then(|id| self.get(*id))
    }

    /// Direct children of `id`, in insertion order
    pub fn children_of(&self, id: Uuid) -> impl Iterator<Item = &StoredAttribute<Uuid>> {
        self.rows
            .iter()
            .filter(move |row| row.parent_id == Some(id))
    }

    pub fn roots(&self) -> impl Iterator<Item = &StoredAttribute<Uuid>> {
        self.rows.iter().filter(|row| row.parent_id.is_none())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl AttributeStore for InMemoryStore {
    type Id = Uuid;
    type Error = StoreError;

    fn insert(
        &mut self,
        attribute: NewAttribute<Uuid>,
    ) -> Result<StoredAttribute<Uuid>, StoreError> {
        let key = AttributeKey::new(attribute.col_index, &attribute.value);
        if self.by_key.contains_key(&key) {
            return Err(StoreError::Duplicate(key));
        }
        if let Some(parent) = attribute.parent_id {
            if !self.by_id.contains_key(&parent) {
                return Err(StoreError::UnknownParent(parent));
            }
        }

        let stored = StoredAttribute {
            id: Uuid::new_v4(),
            name: attribute.name,
            value: attribute.value,
            col_index: attribute.col_index,
            parent_id: attribute.parent_id,
        };
        self.by_id.insert(stored.id, self.rows.len());
        self.by_key.insert(key, stored.id);
        self.rows.push(stored.clone());
        Ok(stored)
    }
}
