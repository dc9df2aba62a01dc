//! Validation of the parent relation
//!
//! Checks run before anything is handed to the store:
//! - every parent reference resolves to a known attribute
//! - the child -> parent relation has no cycles
//!
//! All problems are collected; validation never stops at the first one.

use crate::error::HierarchyError;
use crate::hierarchy::AttributeHierarchy;
use crate::key::AttributeKey;
use indexmap::IndexSet;
use std::collections::HashSet;

/// Outcome of [`validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<HierarchyError>,
}

impl ValidationReport {
    /// True when no errors were found
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in detection order
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[HierarchyError] {
        &self.errors
    }

    /// Human-readable descriptions, one per error
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Consume into the error list
    #[inline]
    #[must_use]
    pub fn into_errors(self) -> Vec<HierarchyError> {
        self.errors
    }
}

/// Check a hierarchy for orphaned parent references and cycles
///
/// Pure and idempotent: the hierarchy is only read.
#[must_use]
pub fn validate(hierarchy: &AttributeHierarchy) -> ValidationReport {
    let mut errors = Vec::new();
    check_orphans(hierarchy, &mut errors);
    check_cycles(hierarchy, &mut errors);

    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "hierarchy failed validation");
    }

    ValidationReport { errors }
}

fn check_orphans(hierarchy: &AttributeHierarchy, errors: &mut Vec<HierarchyError>) {
    for (child, parent) in hierarchy.hierarchy_map() {
        if !hierarchy.contains(parent) {
            errors.push(HierarchyError::OrphanReference {
                child: child.clone(),
                parent: parent.clone(),
            });
        }
    }
}

/// Each key has at most one parent, so a depth-first walk is a walk up a
/// single chain. `visited` spans the whole check; `on_stack` is the current
/// chain only.
fn check_cycles(hierarchy: &AttributeHierarchy, errors: &mut Vec<HierarchyError>) {
    let map = hierarchy.hierarchy_map();
    let mut visited: HashSet<&AttributeKey> = HashSet::new();

    let starts = hierarchy.unique_attributes().keys().chain(map.keys());
    for start in starts {
        if visited.contains(start) {
            continue;
        }

        let mut on_stack: IndexSet<&AttributeKey> = IndexSet::new();
        let mut current = Some(start);

        while let Some(key) = current {
            if let Some(position) = on_stack.get_index_of(key) {
                let cycle = on_stack
                    .iter()
                    .skip(position)
                    .map(|k| (*k).clone())
                    .collect();
                errors.push(HierarchyError::CircularReference {
                    key: key.clone(),
                    cycle,
                });
                break;
            }
            if !visited.insert(key) {
                break;
            }
            on_stack.insert(key);
            current = map.get(key);
        }
    }
}
