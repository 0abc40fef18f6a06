//! Strict validation of imported recipient lists.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::DataSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipientError {
    #[error("missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),
    #[error("row {row}: '{field}' is empty")]
    EmptyField { row: usize, field: String },
    #[error("row {row}: '{field}' is not a valid email address: {value}")]
    InvalidEmail {
        row: usize,
        field: String,
        value: String,
    },
}

/// Columns a recipient import must provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipientSchema {
    /// Every one of these must appear as a column.
    pub required_headers: Vec<String>,
    /// Must be non-blank in every row.
    pub required_fields: Vec<String>,
    /// Checked with [`is_valid_email`] when non-blank.
    pub email_fields: Vec<String>,
}

impl Default for RecipientSchema {
    fn default() -> Self {
        let strings = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() };
        Self {
            required_headers: strings(&[
                "user_code",
                "student_id",
                "full_name",
                "email_hcmut",
                "email_individual",
                "phone_number",
                "status",
            ]),
            required_fields: strings(&["full_name", "email_hcmut"]),
            email_fields: strings(&["email_hcmut", "email_individual"]),
        }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

pub fn is_valid_email(address: &str) -> bool {
    email_re().is_match(address)
}

/// Check a dataset against the schema. Rows are reported 1-based.
///
/// Blank rows are skipped; they are editor padding, not recipients.
pub fn validate(dataset: &DataSet, schema: &RecipientSchema) -> Result<(), RecipientError> {
    let missing: Vec<String> = schema
        .required_headers
        .iter()
        .filter(|h| dataset.field(h).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(RecipientError::MissingHeaders(missing));
    }

    for (i, row) in dataset.rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let row_no = i + 1;
        for field in &schema.required_fields {
            if row.get(field).map_or(true, |v| v.trim().is_empty()) {
                return Err(RecipientError::EmptyField {
                    row: row_no,
                    field: field.clone(),
                });
            }
        }
        for field in &schema.email_fields {
            let value = row.get(field).unwrap_or("").trim();
            if !value.is_empty() && !is_valid_email(value) {
                return Err(RecipientError::InvalidEmail {
                    row: row_no,
                    field: field.clone(),
                    value: value.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// The downloadable import template: just the header line.
pub fn template_csv(schema: &RecipientSchema) -> String {
    let mut out = schema.required_headers.join(",");
    out.push('\n');
    out
}
