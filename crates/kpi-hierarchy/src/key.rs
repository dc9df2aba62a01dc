//! AttributeKey - identity of a framework attribute
//!
//! Provides [`AttributeKey`], derived from a cell's column index and its
//! normalized value. Two cells with the same key are the same node no matter
//! how many rows repeat them.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Composite identity `(column, normalized value)`
///
/// Normalization trims surrounding whitespace and lower-cases the value, so
/// `"  Payroll "` and `"PAYROLL"` in the same column are one node.
///
/// # Example
/// ```
/// use kpi_hierarchy::AttributeKey;
///
/// let a = AttributeKey::new(1, "  Payroll ");
/// let b = AttributeKey::new(1, "PAYROLL");
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1:payroll");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AttributeKey {
    /// Zero-based grid column
    col_index: usize,

    /// Trimmed, lower-cased cell value
    value: String,
}

impl AttributeKey {
    /// Derive the key for a cell
    ///
    /// Total: a blank value yields a degenerate key (see [`is_blank`](Self::is_blank)).
    #[inline]
    #[must_use]
    pub fn new(col_index: usize, value: &str) -> Self {
        Self {
            col_index,
            value: normalize(value),
        }
    }

    /// Column this key lives in
    #[inline]
    #[must_use]
    pub fn col_index(&self) -> usize {
        self.col_index
    }

    /// Normalized value
    #[inline]
    #[must_use]
    pub fn normalized_value(&self) -> &str {
        &self.value
    }

    /// True when the source value was empty or whitespace only
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }

    /// True for first-column keys, which never have a parent
    #[inline]
    #[must_use]
    pub fn is_root_level(&self) -> bool {
        self.col_index == 0
    }
}

/// Trim, then case-fold
#[inline]
#[must_use]
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

impl Display for AttributeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.col_index, self.value)
    }
}

impl From<AttributeKey> for String {
    fn from(key: AttributeKey) -> Self {
        key.to_string()
    }
}

impl FromStr for AttributeKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (col, value) = s
            .split_once(':')
            .ok_or_else(|| ParseKeyError::MissingSeparator(s.to_string()))?;
        let col_index = col
            .parse::<usize>()
            .map_err(|_| ParseKeyError::InvalidColumn(col.to_string()))?;
        Ok(Self::new(col_index, value))
    }
}

impl TryFrom<String> for AttributeKey {
    type Error = ParseKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Errors parsing the `"{col}:{value}"` form of a key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKeyError {
    /// No `:` between column and value
    #[error("attribute key '{0}' is missing the ':' separator")]
    MissingSeparator(String),

    /// Column part is not a non-negative integer
    #[error("invalid column index in attribute key: '{0}'")]
    InvalidColumn(String),
}
