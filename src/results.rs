use std::sync::Arc;

use crate::types::CellValue;

/// A row from a query result.
///
/// Column names are shared across every row of the same `ResultSet`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row, in column order
    pub values: Vec<CellValue>,
}

impl ResultRow {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<CellValue>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name
    ///
    /// # Returns
    ///
    /// The value at the column, or None if the column wasn't found
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&CellValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }
}

/// Rows returned by one query, in the order SQLite produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<ResultRow>,
    column_names: Arc<Vec<String>>,
}

impl ResultSet {
    /// Create an empty result set whose rows will share `column_names`.
    #[must_use]
    pub fn with_columns(column_names: Vec<String>, capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: Arc::new(column_names),
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn add_row_values(&mut self, values: Vec<CellValue>) {
        self.results
            .push(ResultRow::new(Arc::clone(&self.column_names), values));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// First column of every row, as text where the value is text.
    #[must_use]
    pub fn first_column_text(&self) -> Vec<Option<&str>> {
        self.results
            .iter()
            .map(|row| row.get_by_index(0).and_then(CellValue::as_text))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.results.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
