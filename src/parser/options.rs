//! Parsing options and configuration.

/// Largest dense grid a single table may allocate, in cells.
pub const DEFAULT_MAX_TABLE_CELLS: usize = 1_000_000;

/// Options for turning an analysis response into a [`Document`](crate::model::Document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Resolve KEY_VALUE_SET blocks into form fields
    pub extract_forms: bool,

    /// Reconstruct TABLE blocks into grids
    pub extract_tables: bool,

    /// Collect LINE text for plain-text output
    pub extract_lines: bool,

    /// Upper bound on `rows × columns` for one reconstructed table
    pub max_table_cells: usize,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable form extraction.
    pub fn with_forms(mut self, extract: bool) -> Self {
        self.extract_forms = extract;
        self
    }

    /// Enable or disable table extraction.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.extract_tables = extract;
        self
    }

    /// Enable or disable line collection.
    pub fn with_lines(mut self, extract: bool) -> Self {
        self.extract_lines = extract;
        self
    }

    /// Extract form fields only.
    pub fn forms_only(self) -> Self {
        self.with_forms(true).with_tables(false).with_lines(false)
    }

    /// Extract tables only.
    pub fn tables_only(self) -> Self {
        self.with_forms(false).with_tables(true).with_lines(false)
    }

    /// Set the table size guard.
    pub fn with_max_table_cells(mut self, cells: usize) -> Self {
        self.max_table_cells = cells;
        self
    }

    /// Analysis features a service must run to satisfy these options.
    pub fn feature_types(&self) -> Vec<FeatureType> {
        let mut features = Vec::with_capacity(2);
        if self.extract_tables {
            features.push(FeatureType::Tables);
        }
        if self.extract_forms {
            features.push(FeatureType::Forms);
        }
        features
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extract_forms: true,
            extract_tables: true,
            extract_lines: true,
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
        }
    }
}

/// Analysis features requested from the document-analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    /// Table structure (TABLE / CELL blocks)
    Tables,
    /// Key/value pairs (KEY_VALUE_SET blocks)
    Forms,
}

impl FeatureType {
    /// Wire name of the feature.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Tables => "TABLES",
            FeatureType::Forms => "FORMS",
        }
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
