//! KPI Framework Import
//!
//! Reads framework spreadsheets (CSV, TSV or JSON), hands the cells to
//! [`kpi_hierarchy`] for validation and ordering, then writes the result
//! into an [`AttributeStore`] parents first.
//!
//! # Example
//!
//! ```rust
//! use kpi_import::{CellSource, Grid, ImportConfig, Importer, InMemoryStore};
//!
//! let grid = Grid::new(
//!     vec!["Domain".into(), "Area".into()],
//!     vec![
//!         vec!["Finance".into(), "Payroll".into()],
//!         vec!["Finance".into(), "Audit".into()],
//!     ],
//! );
//!
//! let mut store = InMemoryStore::new();
//! let summary = Importer::new(ImportConfig::default())
//!     .import(&mut store, &CellSource::Grid(grid))
//!     .unwrap();
//!
//! assert_eq!(summary.nodes_inserted, 3);
//! assert_eq!(summary.roots, 1);
//! ```

#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod grid;
pub mod importer;
pub mod insert;
pub mod source;
pub mod store;

// Re-exports
pub use config::ImportConfig;
pub use error::{GridError, ImportError, InsertError};
pub use grid::Grid;
pub use importer::{ImportSummary, Importer};
pub use insert::{insert_prepared, InsertionReport};
pub use source::{load, read_delimited, read_json, CellSource, GridFormat};
pub use store::{AttributeStore, InMemoryStore, NewAttribute, StoreError, StoredAttribute};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for grid imports
    pub use crate::{
        AttributeStore, CellSource, Grid, ImportConfig, ImportError, ImportSummary, Importer,
        InMemoryStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
