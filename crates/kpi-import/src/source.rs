//! Reading cells from CSV and JSON files
//!
//! Supported inputs:
//! - `.csv` / `.tsv`: a grid, header row first unless configured otherwise
//! - `.json`: either `{"headers": [...], "rows": [[...]]}` or an array of
//!   raw attribute cells (`name`, `value`, `rowIndex`, `colIndex`)

use crate::error::GridError;
use crate::grid::Grid;
use kpi_hierarchy::RawAttribute;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// File formats understood by [`load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFormat {
    /// Comma separated
    Csv,
    /// Tab separated
    Tsv,
    /// Grid object or cell array
    Json,
}

impl GridFormat {
    /// Detect format from the file extension
    ///
    /// # Errors
    /// [`GridError::UnsupportedFormat`] for anything else.
    pub fn from_path(path: &Path) -> Result<Self, GridError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            _ => Err(GridError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Cells as they came out of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellSource {
    /// Spreadsheet-shaped input
    Grid(Grid),
    /// Already-addressed cells
    Cells(Vec<RawAttribute>),
}

impl CellSource {
    /// Raw attributes for the hierarchy builder
    ///
    /// `fill_merged_cells` only applies to grids; explicit cells are used
    /// as given.
    #[must_use]
    pub fn to_raw_attributes(&self, fill_merged_cells: bool) -> Vec<RawAttribute> {
        match self {
            Self::Grid(grid) => grid.to_raw_attributes(fill_merged_cells),
            Self::Cells(cells) => cells.clone(),
        }
    }
}

/// Read a delimited grid
///
/// # Errors
/// Propagates CSV decoding errors.
pub fn read_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    has_header: bool,
) -> Result<Grid, GridError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut grid = Grid::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if idx == 0 && has_header {
            grid.headers = row;
        } else {
            grid.rows.push(row);
        }
    }

    Ok(grid)
}

/// Spreadsheet cells in JSON arrive typed; numbers and booleans keep their
/// textual form and nulls are blank.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCell {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null(()),
}

impl JsonCell {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
            Self::Bool(flag) => flag.to_string(),
            Self::Null(()) => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonGrid {
    #[serde(default)]
    headers: Vec<String>,
    rows: Vec<Vec<JsonCell>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Grid(JsonGrid),
    Cells(Vec<RawAttribute>),
}

/// Parse a JSON grid or cell array
///
/// # Errors
/// [`GridError::Json`] when the text matches neither shape.
pub fn read_json(text: &str) -> Result<CellSource, GridError> {
    let input: JsonInput = serde_json::from_str(text)?;
    Ok(match input {
        JsonInput::Grid(grid) => CellSource::Grid(Grid::new(
            grid.headers,
            grid.rows
                .into_iter()
                .map(|row| row.into_iter().map(JsonCell::into_text).collect())
                .collect(),
        )),
        JsonInput::Cells(cells) => CellSource::Cells(cells),
    })
}

/// Load cells from a file, choosing the reader by extension
///
/// # Errors
/// Unsupported extension, I/O failure, or malformed content.
pub fn load(path: &Path, has_header: bool) -> Result<CellSource, GridError> {
    let format = GridFormat::from_path(path)?;
    tracing::debug!(path = %path.display(), ?format, "loading grid");

    match format {
        GridFormat::Csv | GridFormat::Tsv => {
            let file = std::fs::File::open(path).map_err(|e| GridError::io_error(path, e))?;
            let delimiter = if format == GridFormat::Tsv { b'\t' } else { b',' };
            Ok(CellSource::Grid(read_delimited(file, delimiter, has_header)?))
        }
        GridFormat::Json => {
            let text = std::fs::read_to_string(path).map_err(|e| GridError::io_error(path, e))?;
            read_json(&text)
        }
    }
}
