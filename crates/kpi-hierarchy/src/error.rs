//! Error types for hierarchy building
//!
//! Every structural problem is a [`HierarchyError`]. They are collected into
//! a list and handed back as data in an [`ImportRejection`], so one import
//! reports all of its problems at once.

use crate::key::AttributeKey;

/// A structural problem found while building or validating a hierarchy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    /// A parent reference that does not resolve to a known attribute
    #[error("orphaned reference: attribute '{child}' points to unknown parent '{parent}'")]
    OrphanReference {
        /// Attribute holding the reference
        child: AttributeKey,
        /// Key that matches no attribute
        parent: AttributeKey,
    },

    /// The parent relation loops back on itself
    #[error("circular reference detected at '{key}': {}", format_cycle(.cycle))]
    CircularReference {
        /// Key at which the loop closed
        key: AttributeKey,
        /// Keys on the loop, starting from the first one entered
        cycle: Vec<AttributeKey>,
    },

    /// A cell with no usable value reached the builder
    #[error("blank attribute value at row {row}, column {col}")]
    BlankValue {
        /// Zero-based row
        row: usize,
        /// Zero-based column
        col: usize,
    },

    /// Unexpected internal failure
    #[error("error processing hierarchy: {0}")]
    ProcessingFailure(String),
}

impl HierarchyError {
    /// Orphan and cycle errors describe the shape of the grid itself
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::OrphanReference { .. } | Self::CircularReference { .. }
        )
    }

    /// Create processing failure
    #[inline]
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingFailure(message.into())
    }
}

fn format_cycle(cycle: &[AttributeKey]) -> String {
    let mut parts: Vec<String> = cycle.iter().map(ToString::to_string).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.to_string());
    }
    parts.join(" -> ")
}

/// An import refused before anything was written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("import rejected with {} error(s)", .errors.len())]
pub struct ImportRejection {
    errors: Vec<HierarchyError>,
}

impl ImportRejection {
    /// Create rejection from accumulated errors
    #[inline]
    #[must_use]
    pub fn new(errors: Vec<HierarchyError>) -> Self {
        Self { errors }
    }

    /// Every problem found, in detection order
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

impl From<HierarchyError> for ImportRejection {
    fn from(error: HierarchyError) -> Self {
        Self::new(vec![error])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orphan_message_names_both_keys() {
        let err = HierarchyError::OrphanReference {
            child: AttributeKey::new(1, "Payroll"),
            parent: AttributeKey::new(0, "Finance"),
        };
        let msg = err.to_string();
        assert!(msg.contains("1:payroll"));
        assert!(msg.contains("0:finance"));
        assert!(err.is_structural());
    }

    #[test]
    fn cycle_message_closes_the_loop() {
        let a = AttributeKey::new(0, "a");
        let b = AttributeKey::new(0, "b");
        let err = HierarchyError::CircularReference {
            key: a.clone(),
            cycle: vec![a, b],
        };
        assert_eq!(
            err.to_string(),
            "circular reference detected at '0:a': 0:a -> 0:b -> 0:a"
        );
    }

    #[test]
    fn rejection_collects_messages() {
        let rejection = ImportRejection::new(vec![
            HierarchyError::BlankValue { row: 3, col: 1 },
            HierarchyError::processing("boom"),
        ]);
        assert_eq!(rejection.errors().len(), 2);
        assert_eq!(
            rejection.messages(),
            vec![
                "blank attribute value at row 3, column 1".to_string(),
                "error processing hierarchy: boom".to_string(),
            ]
        );
        assert!(rejection.to_string().contains("2 error(s)"));
    }

    #[test]
    fn single_error_converts_to_rejection() {
        let rejection: ImportRejection = HierarchyError::processing("x").into();
        assert_eq!(rejection.errors().len(), 1);
        assert!(!rejection.errors()[0].is_structural());
    }
}
