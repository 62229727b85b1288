use std::collections::HashMap;
use std::sync::Arc;

use super::row::{CustomDbRow, index_columns};
use crate::types::RowValues;

/// Rows returned by a query, materialized from the driver's cursor.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns.
    #[must_use]
    pub fn new(column_names: Vec<String>) -> Self {
        Self::with_capacity(column_names, 0)
    }

    /// Create an empty result set with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(column_names: Vec<String>, capacity: usize) -> Self {
        let column_index = Arc::new(index_columns(&column_names));
        Self {
            results: Vec::with_capacity(capacity),
            column_names: Arc::new(column_names),
            column_index,
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    /// Append a row; `row_values` must follow the column order.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        self.results.push(CustomDbRow {
            column_names: Arc::clone(&self.column_names),
            rows: row_values,
            column_index: Arc::clone(&self.column_index),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Take the first row, dropping the rest.
    #[must_use]
    pub fn into_first(self) -> Option<CustomDbRow> {
        self.results.into_iter().next()
    }
}
