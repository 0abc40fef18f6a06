use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scan::scan;
use super::validate::{is_valid, Field};

/// One recipient's values, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRow(BTreeMap<String, String>);

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// True when every value is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Substitute one row into a template.
///
/// A placeholder is replaced only when its name is a declared field and the
/// row holds a value for it. Anything else stays as the original `{{ ... }}`
/// text. Substituted values are never rescanned.
pub fn merge_row(template: &str, row: &DataRow, fields: &[Field]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for token in scan(template) {
        out.push_str(&template[last..token.start]);
        let value = if is_valid(&token.name, fields) {
            row.get(&token.name)
        } else {
            None
        };
        out.push_str(value.unwrap_or(&token.raw));
        last = token.end;
    }

    out.push_str(&template[last..]);
    out
}

/// Produce one merged document per row, in row order.
pub fn merge(template: &str, rows: &[DataRow], fields: &[Field]) -> Vec<String> {
    rows.iter()
        .map(|row| merge_row(template, row, fields))
        .collect()
}
