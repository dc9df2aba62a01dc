//! Raw and processed attributes
//!
//! [`RawAttribute`] is one non-empty spreadsheet cell as handed in by the
//! import caller. [`ProcessedAttribute`] adds the cell's key and the key of
//! its structural parent.

use crate::key::AttributeKey;
use serde::{Deserialize, Serialize};

/// One spreadsheet cell carrying a framework attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttribute {
    /// Category label, usually the column header
    pub name: String,

    /// Cell text; its normalized form is the node identity
    pub value: String,

    /// Zero-based grid row
    pub row_index: usize,

    /// Zero-based grid column
    pub col_index: usize,
}

impl RawAttribute {
    /// Create a raw attribute
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        row_index: usize,
        col_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            row_index,
            col_index,
        }
    }

    /// Identity of this cell
    #[inline]
    #[must_use]
    pub fn key(&self) -> AttributeKey {
        AttributeKey::new(self.col_index, &self.value)
    }

    /// `(row, column)`, the sort order used for processing
    #[inline]
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.row_index, self.col_index)
    }

    /// True when the value is empty after trimming
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// A raw attribute with its resolved identity and parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedAttribute {
    #[serde(flatten)]
    raw: RawAttribute,

    /// Provisional identifier until the store assigns one
    key: AttributeKey,

    /// `None` for roots and for occurrences with no left neighbour
    parent_key: Option<AttributeKey>,
}

impl ProcessedAttribute {
    /// Attach a parent key to a raw attribute
    #[must_use]
    pub fn new(raw: RawAttribute, parent_key: Option<AttributeKey>) -> Self {
        let key = raw.key();
        Self {
            raw,
            key,
            parent_key,
        }
    }

    /// Cell this attribute was built from
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &RawAttribute {
        &self.raw
    }

    /// Identity of the node
    #[inline]
    #[must_use]
    pub fn key(&self) -> &AttributeKey {
        &self.key
    }

    /// Key of the cell to the left, if there was one
    #[inline]
    #[must_use]
    pub fn parent_key(&self) -> Option<&AttributeKey> {
        self.parent_key.as_ref()
    }

    /// Column header of the source cell
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.raw.name
    }

    /// Original (un-normalized) cell value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.raw.value
    }

    /// Zero-based source row
    #[inline]
    #[must_use]
    pub fn row_index(&self) -> usize {
        self.raw.row_index
    }

    /// Zero-based source column
    #[inline]
    #[must_use]
    pub fn col_index(&self) -> usize {
        self.raw.col_index
    }

    /// True when no parent was resolved
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_key.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_attribute_key_uses_column_and_value() {
        let raw = RawAttribute::new("Domain", " Finance ", 4, 0);
        assert_eq!(raw.key(), AttributeKey::new(0, "finance"));
        assert_eq!(raw.position(), (4, 0));
    }

    #[test]
    fn raw_attribute_blank_detection() {
        assert!(RawAttribute::new("Domain", " \t", 0, 0).is_blank());
        assert!(!RawAttribute::new("Domain", "x", 0, 0).is_blank());
    }

    #[test]
    fn processed_attribute_keeps_original_value() {
        let raw = RawAttribute::new("Area", "PAYROLL", 1, 1);
        let parent = AttributeKey::new(0, "Finance");
        let processed = ProcessedAttribute::new(raw, Some(parent.clone()));

        assert_eq!(processed.value(), "PAYROLL");
        assert_eq!(processed.key().normalized_value(), "payroll");
        assert_eq!(processed.parent_key(), Some(&parent));
        assert!(!processed.is_root());
    }

    #[test]
    fn raw_attribute_uses_camel_case_fields() {
        let json = r#"{"name":"Domain","value":"Legal","rowIndex":0,"colIndex":0}"#;
        let raw: RawAttribute = serde_json::from_str(json).unwrap();
        assert_eq!(raw, RawAttribute::new("Domain", "Legal", 0, 0));
    }

    #[test]
    fn processed_attribute_serializes_flat() {
        let processed = ProcessedAttribute::new(RawAttribute::new("Area", "Tax", 2, 2), None);
        let value = serde_json::to_value(&processed).unwrap();
        assert_eq!(value["value"], "Tax");
        assert_eq!(value["key"], "2:tax");
        assert!(value["parentKey"].is_null());
    }
}
