//! Two-phase insertion
//!
//! Attributes are written one column at a time. After each column the
//! stored rows are fed back into an [`InsertionMap`] so the next column can
//! turn parent keys into store identifiers.

use crate::error::InsertError;
use crate::store::{AttributeStore, NewAttribute, StoredAttribute};
use kpi_hierarchy::{InsertionMap, ParentId, PreparedHierarchy};
use std::collections::BTreeMap;

/// Outcome of a successful insert
#[derive(Debug, Clone)]
pub struct InsertionReport<Id> {
    ids: InsertionMap<Id>,
    per_column: BTreeMap<usize, usize>,
    roots: usize,
}

impl<Id> InsertionReport<Id> {
    /// Key -> identifier for every stored attribute
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &InsertionMap<Id> {
        &self.ids
    }

    #[inline]
    #[must_use]
    pub fn per_column(&self) -> &BTreeMap<usize, usize> {
        &self.per_column
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> usize {
        self.roots
    }

    /// Total rows written
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.per_column.values().sum()
    }
}

/// Write a prepared hierarchy to `store`, parents first
///
/// # Errors
/// [`InsertError::UnresolvedParent`] if a parent key never received an
/// identifier, [`InsertError::Store`] if the store refuses a row. Rows
/// written before the failure stay written.
pub fn insert_prepared<S>(
    store: &mut S,
    prepared: &PreparedHierarchy,
) -> Result<InsertionReport<S::Id>, InsertError<S::Error>>
where
    S: AttributeStore,
{
    let _span = tracing::debug_span!("insert_prepared", nodes = prepared.len()).entered();

    let mut ids: InsertionMap<S::Id> = InsertionMap::new();
    let mut per_column = BTreeMap::new();
    let mut roots = 0;

    for col_index in 0..prepared.column_count() {
        let mut stored_column: Vec<StoredAttribute<S::Id>> = Vec::new();

        for attribute in prepared.column(col_index) {
            let parent_id = match ids.parent_id(attribute) {
                ParentId::Root => None,
                ParentId::Resolved(id) => Some(id.clone()),
                ParentId::Unresolved(parent) => {
                    return Err(InsertError::UnresolvedParent {
                        child: attribute.key().clone(),
                        parent: parent.clone(),
                    });
                }
            };
            if parent_id.is_none() {
                roots += 1;
            }

            let stored = store
                .insert(NewAttribute {
                    name: attribute.name().to_string(),
                    value: attribute.value().to_string(),
                    row_index: attribute.row_index(),
                    col_index,
                    parent_id,
                })
                .map_err(|source| InsertError::Store {
                    key: attribute.key().clone(),
                    source,
                })?;
            stored_column.push(stored);
        }

        if stored_column.is_empty() {
            continue;
        }
        tracing::debug!(column = col_index, rows = stored_column.len(), "column stored");
        per_column.insert(col_index, stored_column.len());
        for stored in stored_column {
            ids.record(stored.col_index, &stored.value, stored.id);
        }
    }

    Ok(InsertionReport {
        ids,
        per_column,
        roots,
    })
}
