//! Parent resolution
//!
//! The grid layout encodes one parent/child edge per row per column
//! transition: the parent of the cell at `(row, col)` is the cell at
//! `(row, col - 1)`. No search across other rows is performed.

use crate::attribute::RawAttribute;
use crate::key::AttributeKey;
use std::collections::HashMap;

/// Positional lookup over the cells of one import
#[derive(Debug, Default)]
pub struct PositionIndex<'a> {
    cells: HashMap<(usize, usize), &'a RawAttribute>,
    duplicates: Vec<(usize, usize)>,
}

impl<'a> PositionIndex<'a> {
    /// Index non-blank cells by `(row, column)`
    ///
    /// When two cells claim the same position the first one wins and the
    /// position is recorded in [`duplicates`](Self::duplicates).
    #[must_use]
    pub fn new(attributes: &'a [RawAttribute]) -> Self {
        let mut cells = HashMap::with_capacity(attributes.len());
        let mut duplicates = Vec::new();

        for attribute in attributes.iter().filter(|a| !a.is_blank()) {
            let position = attribute.position();
            if cells.contains_key(&position) {
                duplicates.push(position);
            } else {
                cells.insert(position, attribute);
            }
        }

        Self { cells, duplicates }
    }

    /// Cell at `(row, column)`, if any
    #[inline]
    #[must_use]
    pub fn get(&self, row_index: usize, col_index: usize) -> Option<&'a RawAttribute> {
        self.cells.get(&(row_index, col_index)).copied()
    }

    /// Positions that appeared more than once in the input
    #[inline]
    #[must_use]
    pub fn duplicates(&self) -> &[(usize, usize)] {
        &self.duplicates
    }

    /// Number of indexed positions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no non-blank cell was indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Key of the cell immediately left of `attribute` in the same row
///
/// Column 0 is always a root. A missing left neighbour means this
/// occurrence has no parent; that is not an error by itself.
#[must_use]
pub fn resolve_parent(attribute: &RawAttribute, index: &PositionIndex<'_>) -> Option<AttributeKey> {
    let parent_col = attribute.col_index.checked_sub(1)?;
    index
        .get(attribute.row_index, parent_col)
        .map(RawAttribute::key)
}
