//! Tabular recipient data: ordered columns plus ordered rows.

pub mod csv;

use serde::Serialize;
use thiserror::Error;

use crate::template::{self, DataRow, Field};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("column name is empty")]
    EmptyColumnName,
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),
    #[error("no column named '{0}'")]
    UnknownColumn(String),
}

/// Result of dropping a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRemoval {
    /// Some row held a non-blank value in the removed column.
    pub had_data: bool,
}

/// Lowercase, trim and join whitespace runs with `_`.
///
/// `"Full  Name "` becomes `"full_name"`.
pub fn normalize_field_name(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataSet {
    pub fields: Vec<Field>,
    pub rows: Vec<DataRow>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Append a column derived from a display label.
    pub fn add_column(&mut self, label: &str) -> Result<&Field, DatasetError> {
        let name = normalize_field_name(label);
        if name.is_empty() {
            return Err(DatasetError::EmptyColumnName);
        }
        if self.field(&name).is_some() {
            return Err(DatasetError::DuplicateColumn(name));
        }
        self.fields.push(Field::new(name, label.trim()));
        Ok(&self.fields[self.fields.len() - 1])
    }

    /// Drop a column and its values from every row.
    pub fn remove_column(&mut self, name: &str) -> Result<ColumnRemoval, DatasetError> {
        let Some(pos) = self.fields.iter().position(|f| f.name == name) else {
            return Err(DatasetError::UnknownColumn(name.to_string()));
        };
        self.fields.remove(pos);

        let mut had_data = false;
        for row in &mut self.rows {
            if let Some(value) = row.remove(name) {
                had_data |= !value.trim().is_empty();
            }
        }
        Ok(ColumnRemoval { had_data })
    }

    pub fn push_row(&mut self, row: DataRow) {
        self.rows.push(row);
    }

    /// Remove rows by index. Unknown indices are ignored.
    pub fn remove_rows(&mut self, indices: &[usize]) {
        let mut i = 0;
        self.rows.retain(|_| {
            let keep = !indices.contains(&i);
            i += 1;
            keep
        });
    }

    /// Rows carrying at least one non-blank value.
    pub fn non_blank_rows(&self) -> Vec<&DataRow> {
        self.rows.iter().filter(|r| !r.is_blank()).collect()
    }

    /// Merge `template` against every non-blank row, in order.
    pub fn merge(&self, template: &str) -> Vec<String> {
        self.non_blank_rows()
            .into_iter()
            .map(|row| template::merge_row(template, row, &self.fields))
            .collect()
    }
}
