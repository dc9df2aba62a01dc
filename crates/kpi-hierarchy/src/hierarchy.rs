//! AttributeHierarchy - working state of one import
//!
//! Built fresh per call from row/column-sorted cells and discarded once the
//! caller has persisted (or rejected) the result.

use crate::attribute::{ProcessedAttribute, RawAttribute};
use crate::key::AttributeKey;
use crate::resolve::{resolve_parent, PositionIndex};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Processed attributes plus the parent relation between their keys
#[derive(Debug, Clone, Default)]
pub struct AttributeHierarchy {
    /// Every occurrence, in processing order
    attributes: Vec<ProcessedAttribute>,

    /// Child key -> parent key, one parent per key
    hierarchy_map: IndexMap<AttributeKey, AttributeKey>,

    /// Key -> first occurrence
    unique_attributes: IndexMap<AttributeKey, ProcessedAttribute>,

    /// Non-fatal observations made while building
    warnings: Vec<HierarchyWarning>,
}

/// Something worth surfacing that does not block the import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HierarchyWarning {
    /// A later occurrence of a node sits under a different parent than the
    /// first one; the first occurrence's parent is kept
    ParentConflict {
        /// Repeated node
        key: AttributeKey,
        /// Row of the conflicting occurrence
        row_index: usize,
        /// Parent taken from the first occurrence
        kept: Option<AttributeKey>,
        /// Parent named by this occurrence
        ignored: Option<AttributeKey>,
    },

    /// Two cells were supplied for the same grid position
    DuplicatePosition {
        /// Shared row
        row_index: usize,
        /// Shared column
        col_index: usize,
    },

    /// A blank cell was skipped
    BlankSkipped {
        /// Row of the blank cell
        row_index: usize,
        /// Column of the blank cell
        col_index: usize,
    },
}

impl Display for HierarchyWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fn show(key: Option<&AttributeKey>) -> String {
            key.map_or_else(|| "(root)".to_string(), ToString::to_string)
        }

        match self {
            Self::ParentConflict {
                key,
                row_index,
                kept,
                ignored,
            } => write!(
                f,
                "row {row_index}: '{key}' appears under '{}' but was first seen under '{}'; keeping the first",
                show(ignored.as_ref()),
                show(kept.as_ref()),
            ),
            Self::DuplicatePosition {
                row_index,
                col_index,
            } => write!(
                f,
                "more than one cell supplied for row {row_index}, column {col_index}; using the first"
            ),
            Self::BlankSkipped {
                row_index,
                col_index,
            } => write!(f, "skipped blank cell at row {row_index}, column {col_index}"),
        }
    }
}

impl AttributeHierarchy {
    /// Create empty hierarchy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve parents for row/column-sorted cells and collect them
    ///
    /// Blank cells are skipped (with a warning); callers that must reject
    /// them check before building.
    #[must_use]
    pub fn build(sorted: &[RawAttribute]) -> Self {
        let index = PositionIndex::new(sorted);
        let mut hierarchy = Self::new();

        for &(row_index, col_index) in index.duplicates() {
            hierarchy.warnings.push(HierarchyWarning::DuplicatePosition {
                row_index,
                col_index,
            });
        }

        for raw in sorted {
            if raw.is_blank() {
                hierarchy.warnings.push(HierarchyWarning::BlankSkipped {
                    row_index: raw.row_index,
                    col_index: raw.col_index,
                });
                continue;
            }
            let parent_key = resolve_parent(raw, &index);
            hierarchy.insert(ProcessedAttribute::new(raw.clone(), parent_key));
        }

        tracing::debug!(
            cells = hierarchy.attributes.len(),
            unique = hierarchy.unique_attributes.len(),
            edges = hierarchy.hierarchy_map.len(),
            "built attribute hierarchy"
        );

        hierarchy
    }

    /// Record one occurrence
    ///
    /// The first occurrence of a key becomes its representative and fixes
    /// its parent. Later occurrences are kept for traceability only.
    pub fn insert(&mut self, attribute: ProcessedAttribute) {
        match self.unique_attributes.get(attribute.key()) {
            None => {
                if let Some(parent) = attribute.parent_key() {
                    self.hierarchy_map
                        .insert(attribute.key().clone(), parent.clone());
                }
                self.unique_attributes
                    .insert(attribute.key().clone(), attribute.clone());
            }
            Some(first) if first.parent_key() != attribute.parent_key() => {
                // A later occurrence without a left neighbour says nothing new.
                if attribute.parent_key().is_some() {
                    tracing::warn!(
                        key = %attribute.key(),
                        row = attribute.row_index(),
                        "conflicting parent for repeated attribute"
                    );
                    self.warnings.push(HierarchyWarning::ParentConflict {
                        key: attribute.key().clone(),
                        row_index: attribute.row_index(),
                        kept: first.parent_key().cloned(),
                        ignored: attribute.parent_key().cloned(),
                    });
                }
            }
            Some(_) => {}
        }
        self.attributes.push(attribute);
    }

    /// Set the parent of `child` directly, replacing any existing edge
    ///
    /// Intended for assembling hierarchies by hand, e.g. from a store.
    pub fn link(&mut self, child: AttributeKey, parent: AttributeKey) -> Option<AttributeKey> {
        self.hierarchy_map.insert(child, parent)
    }

    /// Every occurrence, in input order
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[ProcessedAttribute] {
        &self.attributes
    }

    /// Child key -> parent key
    #[inline]
    #[must_use]
    pub fn hierarchy_map(&self) -> &IndexMap<AttributeKey, AttributeKey> {
        &self.hierarchy_map
    }

    /// First occurrence of each key
    #[inline]
    #[must_use]
    pub fn unique_attributes(&self) -> &IndexMap<AttributeKey, ProcessedAttribute> {
        &self.unique_attributes
    }

    /// Non-fatal findings from building
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[HierarchyWarning] {
        &self.warnings
    }

    /// Recorded parent of `key`
    #[inline]
    #[must_use]
    pub fn parent_of(&self, key: &AttributeKey) -> Option<&AttributeKey> {
        self.hierarchy_map.get(key)
    }

    /// True if `key` is a known node
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &AttributeKey) -> bool {
        self.unique_attributes.contains_key(key)
    }

    /// Unique attributes with no recorded parent
    pub fn roots(&self) -> impl Iterator<Item = &ProcessedAttribute> {
        self.unique_attributes
            .iter()
            .filter(|(key, _)| !self.hierarchy_map.contains_key(*key))
            .map(|(_, attribute)| attribute)
    }

    /// Number of distinct nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.unique_attributes.len()
    }

    /// True when no nodes were recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unique_attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(value: &str, row: usize, col: usize) -> RawAttribute {
        RawAttribute::new(format!("Level {col}"), value, row, col)
    }

    #[test]
    fn build_records_every_occurrence_and_unique_nodes() {
        let cells = vec![
            cell("Finance", 0, 0),
            cell("Payroll", 0, 1),
            cell("Finance", 1, 0),
            cell("payroll ", 1, 1),
        ];
        let hierarchy = AttributeHierarchy::build(&cells);

        assert_eq!(hierarchy.attributes().len(), 4);
        assert_eq!(hierarchy.len(), 2);
        assert_eq!(
            hierarchy.parent_of(&AttributeKey::new(1, "payroll")),
            Some(&AttributeKey::new(0, "finance"))
        );
        assert!(hierarchy.warnings().is_empty());
    }

    #[test]
    fn first_occurrence_parent_wins() {
        let cells = vec![
            cell("Finance", 0, 0),
            cell("Payroll", 0, 1),
            cell("Legal", 1, 0),
            cell("Payroll", 1, 1),
        ];
        let hierarchy = AttributeHierarchy::build(&cells);
        let payroll = AttributeKey::new(1, "payroll");

        assert_eq!(
            hierarchy.parent_of(&payroll),
            Some(&AttributeKey::new(0, "finance"))
        );
        assert_eq!(
            hierarchy.warnings(),
            &[HierarchyWarning::ParentConflict {
                key: payroll,
                row_index: 1,
                kept: Some(AttributeKey::new(0, "finance")),
                ignored: Some(AttributeKey::new(0, "legal")),
            }]
        );
    }

    #[test]
    fn parentless_repeat_is_not_a_conflict() {
        let cells = vec![
            cell("Finance", 0, 0),
            cell("Payroll", 0, 1),
            cell("Payroll", 1, 1),
        ];
        let hierarchy = AttributeHierarchy::build(&cells);
        assert!(hierarchy.warnings().is_empty());
    }

    #[test]
    fn blank_cells_are_skipped_with_warning() {
        let cells = vec![cell("Finance", 0, 0), cell("  ", 0, 1)];
        let hierarchy = AttributeHierarchy::build(&cells);

        assert_eq!(hierarchy.attributes().len(), 1);
        assert_eq!(
            hierarchy.warnings(),
            &[HierarchyWarning::BlankSkipped {
                row_index: 0,
                col_index: 1
            }]
        );
    }

    #[test]
    fn roots_are_nodes_without_parent() {
        let cells = vec![cell("Legal", 0, 0), cell("Finance", 1, 0), cell("Tax", 1, 1)];
        let hierarchy = AttributeHierarchy::build(&cells);
        let roots: Vec<&str> = hierarchy.roots().map(ProcessedAttribute::value).collect();
        assert_eq!(roots, vec!["Legal", "Finance"]);
    }

    #[test]
    fn link_replaces_existing_edge() {
        let mut hierarchy = AttributeHierarchy::new();
        let child = AttributeKey::new(1, "b");
        assert_eq!(hierarchy.link(child.clone(), AttributeKey::new(0, "a")), None);
        assert_eq!(
            hierarchy.link(child, AttributeKey::new(0, "c")),
            Some(AttributeKey::new(0, "a"))
        );
    }

    #[test]
    fn warnings_render_readably() {
        let warning = HierarchyWarning::ParentConflict {
            key: AttributeKey::new(1, "payroll"),
            row_index: 4,
            kept: None,
            ignored: Some(AttributeKey::new(0, "legal")),
        };
        assert_eq!(
            warning.to_string(),
            "row 4: '1:payroll' appears under '0:legal' but was first seen under '(root)'; keeping the first"
        );
    }
}
