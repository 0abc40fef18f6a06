use serde::{Deserialize, Serialize};

use super::scan::{scan, Token};

/// A data column that placeholders may refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Identifier used inside `{{ }}`; no internal whitespace.
    pub name: String,
    /// Human readable header, e.g. the original CSV header text.
    #[serde(default)]
    pub label: String,
}

impl Field {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }

    /// A field whose label is its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
        }
    }
}

/// True iff some field's name equals `token_name` exactly (case-sensitive).
pub fn is_valid(token_name: &str, fields: &[Field]) -> bool {
    fields.iter().any(|f| f.name == token_name)
}

/// Tokens in `template` that name no known field, in scan order.
pub fn unknown_tokens(template: &str, fields: &[Field]) -> Vec<Token> {
    scan(template)
        .into_iter()
        .filter(|t| !is_valid(&t.name, fields))
        .collect()
}
