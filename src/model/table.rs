//! Table types.

use serde::{Deserialize, Serialize};

/// A reconstructed table: a dense grid of cell text.
///
/// Every row has the same number of columns. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows of cell text
    pub rows: Vec<Vec<String>>,

    /// Page the table was found on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Whether the source declared any cell on the first row
    #[serde(default = "header_present_default", skip_serializing_if = "is_true")]
    pub header_present: bool,
}

fn header_present_default() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows of text.
    ///
    /// Rows shorter than the widest row are padded with empty cells.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self {
            header_present: !rows.is_empty(),
            rows,
            page: None,
        }
    }

    /// Allocate a `rows × columns` grid of empty cells with no header cells.
    pub fn blank(rows: usize, columns: usize) -> Self {
        Self {
            rows: vec![vec![String::new(); columns]; rows],
            page: None,
            header_present: false,
        }
    }

    /// Record whether the first row had cells in the source.
    pub fn with_header_present(mut self, present: bool) -> Self {
        self.header_present = present;
        self
    }

    /// Set the page and return self.
    pub fn on_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the header row.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Get body rows (everything after the header).
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Check whether the table has a header row to render.
    ///
    /// A header counts when the first row had at least one cell in the
    /// source, even if every such cell is blank. Tables without one are not
    /// rendered as Markdown tables.
    pub fn has_header(&self) -> bool {
        self.header_present && !self.rows.is_empty()
    }

    /// Get a cell by 0-based position.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(table.header().is_none());
        assert!(table.body().is_empty());
        assert!(!table.has_header());
    }

    #[test]
    fn test_table_with_data() {
        let table = Table::from_rows([
            vec!["Biomarker", "Value"],
            vec!["HbA1c", "6.1"],
            vec!["LDL"],
        ]);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.header().unwrap(), ["Biomarker", "Value"]);
        assert_eq!(table.body().len(), 2);
        assert_eq!(table.cell(2, 1), Some(""));
        assert_eq!(table.cell(5, 0), None);
    }

    #[test]
    fn test_header_follows_source_cells() {
        let mut table = Table::blank(2, 2);
        table.rows[1][0] = "x".into();
        assert!(!table.has_header());

        let table = table.with_header_present(true);
        assert!(table.has_header());
        assert_eq!(table.header().unwrap(), ["", ""]);

        assert!(Table::from_rows([["", ""]]).has_header());
        assert!(!Table::new().with_header_present(true).has_header());
    }

    #[test]
    fn test_header_flag_serialization() {
        let json = serde_json::to_string(&Table::from_rows([["a"]])).unwrap();
        assert_eq!(json, r#"{"rows":[["a"]]}"#);
        let back: Table = serde_json::from_str(&json).unwrap();
        assert!(back.header_present);

        let json = serde_json::to_string(&Table::blank(1, 1)).unwrap();
        assert_eq!(json, r#"{"rows":[[""]],"header_present":false}"#);
    }

    #[test]
    fn test_plain_text() {
        let table = Table::from_rows([["a", "b"], ["c", "d"]]);
        assert_eq!(table.plain_text(), "a\tb\nc\td");
    }
}
