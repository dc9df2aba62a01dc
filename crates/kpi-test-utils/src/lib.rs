//! Testing utilities for KPI frameworks workspace
//!
//! Shared grid fixtures, temp files and a store that fails on demand.

#![allow(missing_docs)]

use kpi_hierarchy::RawAttribute;
use kpi_import::{AttributeStore, Grid, NewAttribute, StoredAttribute};
use std::io::Write;
use tempfile::NamedTempFile;

pub const FINANCE_HEADERS: [&str; 3] = ["Domain", "Area", "Control"];

/// Finance framework as CSV: two roots, a repeated branch and a deep leaf
pub const FINANCE_CSV: &str = "\
Domain,Area,Control
Legal,,
Finance,Payroll,Tax
Finance,Payroll,Bonus
Finance,Audit,
";

/// Same framework exported with vertically merged cells
pub const FINANCE_MERGED_CSV: &str = "\
Domain,Area,Control
Legal,,
Finance,Payroll,Tax
,,Bonus
,Audit,
";

pub fn cell(value: &str, row: usize, col: usize) -> RawAttribute {
    let name = FINANCE_HEADERS
        .get(col)
        .map_or_else(|| format!("Column {}", col + 1), ToString::to_string);
    RawAttribute::new(name, value, row, col)
}

/// The cells of [`FINANCE_CSV`], in grid order
pub fn finance_cells() -> Vec<RawAttribute> {
    vec![
        cell("Legal", 0, 0),
        cell("Finance", 1, 0),
        cell("Payroll", 1, 1),
        cell("Tax", 1, 2),
        cell("Finance", 2, 0),
        cell("Payroll", 2, 1),
        cell("Bonus", 2, 2),
        cell("Finance", 3, 0),
        cell("Audit", 3, 1),
    ]
}

pub fn grid(headers: &[&str], rows: &[&[&str]]) -> Grid {
    Grid::new(
        headers.iter().map(ToString::to_string).collect(),
        rows.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect(),
    )
}

pub fn finance_grid() -> Grid {
    grid(
        &FINANCE_HEADERS,
        &[
            &["Legal"],
            &["Finance", "Payroll", "Tax"],
            &["Finance", "Payroll", "Bonus"],
            &["Finance", "Audit"],
        ],
    )
}

/// Write `contents` to a temp file ending in `.{extension}`
pub fn write_temp_grid(extension: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("framework-")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("store unavailable after {0} writes")]
pub struct StoreUnavailable(pub usize);

/// Counts writes and refuses the one after `limit`
#[derive(Debug, Default)]
pub struct FailingStore {
    limit: usize,
    pub written: Vec<NewAttribute<u32>>,
}

impl FailingStore {
    pub fn after(limit: usize) -> Self {
        Self {
            limit,
            written: Vec::new(),
        }
    }
}

impl AttributeStore for FailingStore {
    type Id = u32;
    type Error = StoreUnavailable;

    fn insert(
        &mut self,
        attribute: NewAttribute<u32>,
    ) -> Result<StoredAttribute<u32>, StoreUnavailable> {
        if self.written.len() >= self.limit {
            return Err(StoreUnavailable(self.limit));
        }
        let id = u32::try_from(self.written.len()).unwrap() + 1;
        let stored = StoredAttribute {
            id,
            name: attribute.name.clone(),
            value: attribute.value.clone(),
            col_index: attribute.col_index,
            parent_id: attribute.parent_id,
        };
        self.written.push(attribute);
        Ok(stored)
    }
}
