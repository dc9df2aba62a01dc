//! Grid - headers plus rows of cell text
//!
//! Converts a spreadsheet-shaped grid into [`RawAttribute`]s: one per
//! non-blank cell, named after its column header.

use kpi_hierarchy::{normalize, RawAttribute};
use serde::{Deserialize, Serialize};

/// A rectangular-ish table of cells; rows may be ragged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Column headers, used as attribute names
    #[serde(default)]
    pub headers: Vec<String>,

    /// Data rows (header row excluded)
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    /// Create grid
    #[inline]
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Widest of the header row and all data rows
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Header for `col_index`, or `"Column N"` (1-based) when missing
    #[must_use]
    pub fn column_name(&self, col_index: usize) -> String {
        self.headers
            .get(col_index)
            .map(|header| header.trim())
            .filter(|header| !header.is_empty())
            .map_or_else(|| format!("Column {}", col_index + 1), str::to_string)
    }

    /// One attribute per non-blank cell
    ///
    /// With `fill_merged_cells`, a blank cell left of the row's last
    /// non-blank cell takes the nearest value above it in the same column,
    /// as long as no cell further left has changed value since. Repeating
    /// the same value (case and padding aside) is not a change. This is how
    /// vertically merged cells usually arrive after export.
    #[must_use]
    pub fn to_raw_attributes(&self, fill_merged_cells: bool) -> Vec<RawAttribute> {
        let names: Vec<String> = (0..self.width()).map(|col| self.column_name(col)).collect();
        let mut carried: Vec<Option<&str>> = vec![None; names.len()];
        let mut cells = Vec::new();

        for (row_index, row) in self.rows.iter().enumerate() {
            let Some(last) = row.iter().rposition(|cell| !cell.trim().is_empty()) else {
                continue;
            };

            for col_index in 0..=last {
                let text = row[col_index].trim();
                let value = if text.is_empty() {
                    if fill_merged_cells {
                        carried[col_index]
                    } else {
                        None
                    }
                } else {
                    let unchanged = carried[col_index]
                        .is_some_and(|previous| normalize(previous) == normalize(text));
                    if !unchanged {
                        for deeper in &mut carried[col_index + 1..] {
                            *deeper = None;
                        }
                    }
                    carried[col_index] = Some(text);
                    Some(text)
                };

                if let Some(value) = value {
                    cells.push(RawAttribute::new(
                        names[col_index].clone(),
                        value,
                        row_index,
                        col_index,
                    ));
                }
            }
        }

        tracing::debug!(
            rows = self.rows.len(),
            cells = cells.len(),
            fill_merged_cells,
            "converted grid to attributes"
        );

        cells
    }
}
