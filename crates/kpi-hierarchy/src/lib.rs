//! KPI Framework Attribute Hierarchy
//!
//! Rebuilds the parent/child tree of a compliance framework from the flat,
//! position-addressed cells of an imported spreadsheet.
//!
//! # Overview
//!
//! - **AttributeKey**: `(column, normalized value)` identity of a node
//! - **Parent resolution**: the parent of `(row, col)` is the cell at `(row, col - 1)`
//! - **Deduplication & ordering**: one entry per key, parents before children
//! - **Validation**: orphaned parent references and cycles are reported together
//! - **InsertionMap**: key -> store identifier for the second insertion pass
//!
//! Everything here is synchronous and owns its working state per call.
//!
//! # Example
//!
//! ```rust
//! use kpi_hierarchy::{prepare_for_insertion, AttributeTree, RawAttribute};
//!
//! let cells = vec![
//!     RawAttribute::new("Domain", "Finance", 0, 0),
//!     RawAttribute::new("Area", "Payroll", 0, 1),
//!     RawAttribute::new("Domain", "Finance", 1, 0),
//!     RawAttribute::new("Area", "Audit", 1, 1),
//! ];
//!
//! let prepared = prepare_for_insertion(&cells).unwrap();
//! assert_eq!(prepared.len(), 3);
//!
//! let tree = AttributeTree::from_prepared(&prepared);
//! assert_eq!(tree.roots().len(), 1);
//! ```

#![warn(missing_docs)]

pub mod attribute;
pub mod error;
pub mod hierarchy;
pub mod key;
pub mod mapping;
pub mod order;
pub mod prepare;
pub mod resolve;
pub mod tree;
pub mod validation;

// Re-exports
pub use attribute::{ProcessedAttribute, RawAttribute};
pub use error::{HierarchyError, ImportRejection};
pub use hierarchy::{AttributeHierarchy, HierarchyWarning};
pub use key::{normalize, AttributeKey, ParseKeyError};
pub use mapping::{InsertionMap, ParentId};
pub use order::dedupe;
pub use prepare::{prepare_for_insertion, HierarchyBuilder, HierarchyConfig, PreparedHierarchy};
pub use resolve::{resolve_parent, PositionIndex};
pub use tree::{AttributeNode, AttributeTree};
pub use validation::{validate, ValidationReport};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building attribute hierarchies
    pub use crate::{
        prepare_for_insertion, AttributeKey, AttributeTree, HierarchyBuilder, HierarchyConfig,
        HierarchyError, ImportRejection, InsertionMap, ParentId, PreparedHierarchy,
        ProcessedAttribute, RawAttribute,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
