use serde::{Deserialize, Serialize};

use crate::recipients::RecipientSchema;
use crate::template::Markers;

/// Top-level `config.toml`. Every table and key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MailmergeConfig {
    // -- Recipient import validation --
    pub schema: RecipientSchema,

    // -- Preview markers --
    pub preview: Markers,

    // -- Merge defaults --
    pub merge: MergeSettings,
}

impl MailmergeConfig {
    /// Render as a `config.toml` document.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    /// Column that holds each recipient's address.
    pub recipient_field: String,
    /// Subject template used when none is given on the command line.
    pub subject: Option<String>,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            recipient_field: "email".to_string(),
            subject: None,
        }
    }
}
