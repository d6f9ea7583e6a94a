use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pattern::generate_name;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("Row {row} does not exist (table has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
    #[error("Column {column} does not exist (table has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
}

/// One unit of work: a source file and the text fragments extracted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub source_path: PathBuf,
    pub fragments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_name: Option<String>,
}

impl Row {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            fragments: Vec::new(),
            generated_name: None,
        }
    }

    pub fn with_fragments(source_path: impl Into<PathBuf>, fragments: Vec<String>) -> Self {
        Self {
            source_path: source_path.into(),
            fragments,
            generated_name: None,
        }
    }

    /// Rows inserted by hand start without a file.
    pub fn has_source(&self) -> bool {
        !self.source_path.as_os_str().is_empty()
    }
}

/// Ordered table of rows. Display order is rename order.
///
/// Every row holds exactly `columns()` fragments; rows are padded when
/// inserted and widened when a column is added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowStore {
    rows: Vec<Row>,
    columns: usize,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: usize) -> Self {
        Self {
            rows: Vec::new(),
            columns,
        }
    }

    /// Build a store from existing rows, widening the table to the longest
    /// fragment list.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows.iter().map(|r| r.fragments.len()).max().unwrap_or(0);
        let mut store = Self::with_columns(columns);
        for row in rows {
            store.push(row);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    pub fn push(&mut self, row: Row) -> usize {
        let at = self.rows.len();
        self.insert(at, row);
        at
    }

    /// Insert before position `at`; `at` past the end appends.
    /// Returns the index the row landed at.
    pub fn insert(&mut self, at: usize, mut row: Row) -> usize {
        if row.fragments.len() > self.columns {
            self.widen(row.fragments.len());
        }
        row.fragments.resize(self.columns, String::new());
        let at = at.min(self.rows.len());
        self.rows.insert(at, row);
        at
    }

    pub fn remove(&mut self, row: usize) -> Result<Row, RowError> {
        self.check_row(row)?;
        Ok(self.rows.remove(row))
    }

    /// Append an empty column to every row, returning its index.
    pub fn add_column(&mut self) -> usize {
        let index = self.columns;
        self.widen(self.columns + 1);
        index
    }

    pub fn set_fragment(
        &mut self,
        row: usize,
        column: usize,
        text: impl Into<String>,
    ) -> Result<(), RowError> {
        self.check_row(row)?;
        if column >= self.columns {
            return Err(RowError::ColumnOutOfRange {
                column,
                columns: self.columns,
            });
        }
        self.rows[row].fragments[column] = text.into();
        Ok(())
    }

    pub fn set_source(&mut self, row: usize, path: impl AsRef<Path>) -> Result<(), RowError> {
        self.check_row(row)?;
        self.rows[row].source_path = path.as_ref().to_path_buf();
        Ok(())
    }

    /// Compute the generated name of every row from the template.
    pub fn generate_names(&mut self, template: &str) {
        for row in &mut self.rows {
            row.generated_name = Some(generate_name(template, &row.fragments));
        }
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    fn widen(&mut self, columns: usize) {
        self.columns = columns;
        for row in &mut self.rows {
            row.fragments.resize(columns, String::new());
        }
    }

    fn check_row(&self, row: usize) -> Result<(), RowError> {
        if row >= self.rows.len() {
            return Err(RowError::RowOutOfRange {
                row,
                len: self.rows.len(),
            });
        }
        Ok(())
    }
}
