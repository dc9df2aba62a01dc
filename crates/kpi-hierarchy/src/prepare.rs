//! Orchestration entry point
//!
//! [`prepare_for_insertion`] runs the stages in order:
//! 1. sort cells by `(row, column)`
//! 2. resolve keys and parents into an [`AttributeHierarchy`]
//! 3. validate, returning every problem at once on failure
//! 4. deduplicate and order for insertion

use crate::attribute::{ProcessedAttribute, RawAttribute};
use crate::error::{HierarchyError, ImportRejection};
use crate::hierarchy::{AttributeHierarchy, HierarchyWarning};
use crate::order::dedupe;
use crate::validation::validate;
use serde::{Deserialize, Serialize};

/// Hierarchy builder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Report blank cells as errors instead of skipping them
    pub reject_blank_values: bool,
    /// Keep warnings about repeated nodes found under different parents
    pub report_parent_conflicts: bool,
}

impl HierarchyConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With blank value rejection
    #[inline]
    #[must_use]
    pub fn with_reject_blank_values(mut self, reject: bool) -> Self {
        self.reject_blank_values = reject;
        self
    }

    /// With parent conflict reporting
    #[inline]
    #[must_use]
    pub fn with_parent_conflicts(mut self, report: bool) -> Self {
        self.report_parent_conflicts = report;
        self
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            reject_blank_values: true,
            report_parent_conflicts: true,
        }
    }
}

/// A validated hierarchy and its insertion order
#[derive(Debug, Clone)]
pub struct PreparedHierarchy {
    hierarchy: AttributeHierarchy,
    ordered: Vec<ProcessedAttribute>,
    warnings: Vec<HierarchyWarning>,
}

impl PreparedHierarchy {
    /// Hierarchy the order was derived from
    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &AttributeHierarchy {
        &self.hierarchy
    }

    /// One attribute per node, parents before children
    #[inline]
    #[must_use]
    pub fn ordered(&self) -> &[ProcessedAttribute] {
        &self.ordered
    }

    /// Warnings kept under the active configuration
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[HierarchyWarning] {
        &self.warnings
    }

    /// Consume into the insertion-ordered list
    #[inline]
    #[must_use]
    pub fn into_ordered(self) -> Vec<ProcessedAttribute> {
        self.ordered
    }

    /// Ordered attributes of one column
    pub fn column(&self, col_index: usize) -> impl Iterator<Item = &ProcessedAttribute> {
        self.ordered
            .iter()
            .filter(move |attribute| attribute.col_index() == col_index)
    }

    /// One past the highest column in use
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.ordered
            .last()
            .map_or(0, |attribute| attribute.col_index() + 1)
    }

    /// Number of distinct nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// True for an empty import
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Builds insertion-ready hierarchies from raw grid cells
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    config: HierarchyConfig,
}

impl HierarchyBuilder {
    /// Create builder with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create builder with custom configuration
    #[inline]
    #[must_use]
    pub fn with_config(config: HierarchyConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Turn raw cells into a validated, ordered hierarchy
    ///
    /// Input order does not matter; cells are sorted by `(row, column)`
    /// first, so equal input sets give equal output.
    ///
    /// # Errors
    /// Returns an [`ImportRejection`] listing every problem found. Nothing
    /// has been written at that point.
    pub fn prepare(&self, raw: &[RawAttribute]) -> Result<PreparedHierarchy, ImportRejection> {
        let _span = tracing::debug_span!("prepare_for_insertion", cells = raw.len()).entered();

        let mut sorted = raw.to_vec();
        sorted.sort_by_key(RawAttribute::position);

        let mut errors: Vec<HierarchyError> = Vec::new();
        if self.config.reject_blank_values {
            errors.extend(
                sorted
                    .iter()
                    .filter(|attribute| attribute.is_blank())
                    .map(|attribute| HierarchyError::BlankValue {
                        row: attribute.row_index,
                        col: attribute.col_index,
                    }),
            );
        }

        let hierarchy = AttributeHierarchy::build(&sorted);
        errors.extend(validate(&hierarchy).into_errors());

        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "rejecting attribute import");
            return Err(ImportRejection::new(errors));
        }

        let ordered = dedupe(&hierarchy).map_err(|error| {
            tracing::error!(%error, "ordering failed on a validated hierarchy");
            ImportRejection::from(error)
        })?;

        let warnings = hierarchy
            .warnings()
            .iter()
            .filter(|warning| {
                self.config.report_parent_conflicts
                    || !matches!(warning, HierarchyWarning::ParentConflict { .. })
            })
            .cloned()
            .collect();

        tracing::info!(
            cells = raw.len(),
            nodes = ordered.len(),
            "attribute hierarchy ready for insertion"
        );

        Ok(PreparedHierarchy {
            hierarchy,
            ordered,
            warnings,
        })
    }
}

/// [`HierarchyBuilder::prepare`] with the default configuration
///
/// # Errors
/// Returns an [`ImportRejection`] listing every problem found.
///
/// # Example
/// ```
/// use kpi_hierarchy::{prepare_for_insertion, RawAttribute};
///
/// let cells = vec![
///     RawAttribute::new("Domain", "Finance", 0, 0),
///     RawAttribute::new("Area", "Payroll", 0, 1),
/// ];
/// let prepared = prepare_for_insertion(&cells).unwrap();
/// assert_eq!(prepared.len(), 2);
/// assert!(prepared.ordered()[0].is_root());
/// ```
pub fn prepare_for_insertion(raw: &[RawAttribute]) -> Result<PreparedHierarchy, ImportRejection> {
    HierarchyBuilder::new().prepare(raw)
}
