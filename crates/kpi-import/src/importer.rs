//! Grid -> store pipeline

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::insert::insert_prepared;
use crate::source::{self, CellSource};
use crate::store::AttributeStore;
use kpi_hierarchy::{HierarchyBuilder, ImportRejection, PreparedHierarchy};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// What an import wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Non-blank cells read from the source
    pub cells_read: usize,
    /// Distinct attributes written
    pub nodes_inserted: usize,
    /// Attributes written without a parent
    pub roots: usize,
    /// Attributes written per column
    pub per_column: BTreeMap<usize, usize>,
    /// Non-fatal findings, already formatted
    pub warnings: Vec<String>,
}

/// Reads grids and writes their hierarchy to a store
#[derive(Debug, Clone, Default)]
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    #[inline]
    #[must_use]
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Load cells from a file using the configured header handling
    ///
    /// # Errors
    /// See [`source::load`].
    pub fn load(&self, path: &Path) -> Result<CellSource, crate::GridError> {
        source::load(path, self.config.has_header)
    }

    /// Validate and order a source without writing anything
    ///
    /// # Errors
    /// An [`ImportRejection`] with every problem found.
    pub fn prepare(&self, source: &CellSource) -> Result<PreparedHierarchy, ImportRejection> {
        let raw = source.to_raw_attributes(self.config.fill_merged_cells);
        HierarchyBuilder::with_config(self.config.hierarchy).prepare(&raw)
    }

    /// Prepare `source` and insert it into `store`
    ///
    /// # Errors
    /// [`ImportError::Rejected`] before any write, or
    /// [`ImportError::Insert`] when the store fails part-way.
    pub fn import<S>(
        &self,
        store: &mut S,
        source: &CellSource,
    ) -> Result<ImportSummary, ImportError<S::Error>>
    where
        S: AttributeStore,
    {
        let raw = source.to_raw_attributes(self.config.fill_merged_cells);
        let prepared = HierarchyBuilder::with_config(self.config.hierarchy).prepare(&raw)?;
        let report = insert_prepared(store, &prepared)?;

        let summary = ImportSummary {
            cells_read: raw.len(),
            nodes_inserted: report.inserted(),
            roots: report.roots(),
            per_column: report.per_column().clone(),
            warnings: prepared.warnings().iter().map(ToString::to_string).collect(),
        };
        tracing::info!(
            cells = summary.cells_read,
            nodes = summary.nodes_inserted,
            warnings = summary.warnings.len(),
            "import complete"
        );

        Ok(summary)
    }

    /// [`Importer::load`] followed by [`Importer::import`]
    ///
    /// # Errors
    /// Any of [`ImportError`]'s variants.
    pub fn import_file<S>(
        &self,
        store: &mut S,
        path: &Path,
    ) -> Result<ImportSummary, ImportError<S::Error>>
    where
        S: AttributeStore,
    {
        let source = self.load(path)?;
        self.import(store, &source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::store::InMemoryStore;
    use kpi_hierarchy::{AttributeKey, RawAttribute};

    fn grid(rows: &[&[&str]]) -> CellSource {
        CellSource::Grid(Grid::new(
            vec!["Domain".into(), "Area".into(), "Control".into()],
            rows.iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        ))
    }

    #[test]
    fn import_counts_per_column() {
        let source = grid(&[
            &["Finance", "Payroll", "Tax"],
            &["Finance", "Payroll", "Bonus"],
            &["Legal"],
        ]);
        let mut store = InMemoryStore::new();
        let summary = Importer::default().import(&mut store, &source).unwrap();

        assert_eq!(summary.cells_read, 7);
        assert_eq!(summary.nodes_inserted, 5);
        assert_eq!(summary.roots, 2);
        assert_eq!(summary.per_column, BTreeMap::from([(0, 2), (1, 1), (2, 2)]));
        assert!(summary.warnings.is_empty());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn prepare_honors_fill_down() {
        let source = grid(&[&["Finance", "Payroll"], &["", "Audit"]]);
        let audit_parent = |prepared: &PreparedHierarchy| {
            prepared
                .ordered()
                .iter()
                .find(|attribute| attribute.value() == "Audit")
                .and_then(|attribute| attribute.parent_key().cloned())
        };

        let strict = Importer::default().prepare(&source).unwrap();
        assert_eq!(audit_parent(&strict), None);

        let filled = Importer::new(ImportConfig::new().with_fill_merged_cells(true))
            .prepare(&source)
            .unwrap();
        assert_eq!(audit_parent(&filled), Some(AttributeKey::new(0, "finance")));
        assert_eq!(filled.len(), 3);
    }

    #[test]
    fn rejection_leaves_store_empty() {
        let source = CellSource::Cells(vec![
            RawAttribute::new("Domain", "Finance", 0, 0),
            RawAttribute::new("Area", "  ", 0, 1),
        ]);
        let mut store = InMemoryStore::new();
        let err = Importer::default().import(&mut store, &source).unwrap_err();
        assert!(err.is_rejection());
        assert!(err.store_untouched());
        assert!(store.is_empty());
    }

    #[test]
    fn summary_serializes() {
        let summary = ImportSummary {
            cells_read: 1,
            nodes_inserted: 1,
            roots: 1,
            per_column: BTreeMap::from([(0, 1)]),
            warnings: vec![],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["per_column"]["0"], 1);
    }
}
