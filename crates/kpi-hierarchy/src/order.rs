//! Deduplication & ordering
//!
//! Collapses repeated attributes into one node each and emits them column by
//! column, so every parent is written before any child that references it.

use crate::attribute::ProcessedAttribute;
use crate::error::HierarchyError;
use crate::hierarchy::AttributeHierarchy;
use crate::key::AttributeKey;
use std::collections::{BTreeMap, HashSet};

/// Insertion-ready list: one entry per key, parents first
///
/// Columns are processed in ascending order and rows in their original
/// order within a column; the first occurrence of each key is emitted.
///
/// # Errors
/// Returns [`HierarchyError::ProcessingFailure`] if a node's parent has not
/// been emitted by the time the node is reached. Validated grid input never
/// triggers this.
pub fn dedupe(hierarchy: &AttributeHierarchy) -> Result<Vec<ProcessedAttribute>, HierarchyError> {
    let mut columns: BTreeMap<usize, Vec<&ProcessedAttribute>> = BTreeMap::new();
    for attribute in hierarchy.attributes() {
        columns
            .entry(attribute.col_index())
            .or_default()
            .push(attribute);
    }

    let mut emitted: HashSet<&AttributeKey> = HashSet::with_capacity(hierarchy.len());
    let mut ordered = Vec::with_capacity(hierarchy.len());

    for (col_index, group) in &columns {
        let before = ordered.len();

        for &attribute in group {
            let key = attribute.key();
            if emitted.contains(key) {
                continue;
            }

            let representative = hierarchy
                .unique_attributes()
                .get(key)
                .ok_or_else(|| {
                    HierarchyError::processing(format!("attribute '{key}' is not registered"))
                })?;

            if let Some(parent) = representative.parent_key() {
                if !emitted.contains(parent) {
                    return Err(HierarchyError::processing(format!(
                        "parent '{parent}' of '{key}' is not ordered before its child"
                    )));
                }
            }

            emitted.insert(key);
            ordered.push(representative.clone());
        }

        tracing::trace!(col = col_index, emitted = ordered.len() - before, "ordered column");
    }

    Ok(ordered)
}
