//! Import configuration

use kpi_hierarchy::HierarchyConfig;
use serde::{Deserialize, Serialize};

/// How a grid file is read and turned into a hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// First CSV record holds the column headers
    pub has_header: bool,
    /// Treat a blank cell under a value as a vertically merged continuation
    pub fill_merged_cells: bool,
    /// Hierarchy builder settings
    pub hierarchy: HierarchyConfig,
}

impl ImportConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With header row handling
    #[inline]
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// With merged cell fill-down
    #[inline]
    #[must_use]
    pub fn with_fill_merged_cells(mut self, fill: bool) -> Self {
        self.fill_merged_cells = fill;
        self
    }

    /// With hierarchy builder settings
    #[inline]
    #[must_use]
    pub fn with_hierarchy(mut self, hierarchy: HierarchyConfig) -> Self {
        self.hierarchy = hierarchy;
        self
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            fill_merged_cells: false,
            hierarchy: HierarchyConfig::default(),
        }
    }
}
