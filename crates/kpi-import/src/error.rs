//! Error types for grid loading and insertion

use kpi_hierarchy::{AttributeKey, ImportRejection};
use std::path::PathBuf;

/// Errors reading a grid file
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON, or JSON of neither supported shape
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// No reader for this file type
    #[error("unsupported grid format: '{0}' (expected .csv, .tsv or .json)")]
    UnsupportedFormat(String),
}

impl GridError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors during the two-phase insert
#[derive(Debug, thiserror::Error)]
pub enum InsertError<E>
where
    E: std::error::Error + 'static,
{
    /// A child was reached before its parent had an identifier
    #[error("parent '{parent}' of '{child}' has no stored identifier")]
    UnresolvedParent {
        /// Attribute that could not be written
        child: AttributeKey,
        /// Parent key missing from the insertion map
        parent: AttributeKey,
    },

    /// The store refused a write
    #[error("store rejected attribute '{key}': {source}")]
    Store {
        /// Attribute being written
        key: AttributeKey,
        /// Store-specific failure
        #[source]
        source: E,
    },
}

/// Errors from a full import
#[derive(Debug, thiserror::Error)]
pub enum ImportError<E>
where
    E: std::error::Error + 'static,
{
    /// The file could not be read; nothing was written
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Grid failed validation; nothing was written
    #[error(transparent)]
    Rejected(#[from] ImportRejection),

    /// Writing to the store failed part-way
    #[error(transparent)]
    Insert(#[from] InsertError<E>),
}

impl<E> ImportError<E>
where
    E: std::error::Error + 'static,
{
    /// Messages suitable for showing to whoever uploaded the grid
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Rejected(rejection) => rejection.messages(),
            Self::Grid(error) => vec![error.to_string()],
            Self::Insert(error) => vec![error.to_string()],
        }
    }

    /// True when the grid itself was refused
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// True when the store was never touched
    #[inline]
    #[must_use]
    pub fn store_untouched(&self) -> bool {
        !matches!(self, Self::Insert(_))
    }
}
