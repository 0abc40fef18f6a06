//! Turn templates and recipients into ready-to-send messages.
//!
//! Two modes mirror the composer: mail merge (one message per data row)
//! and common (one message to explicit address lists). Nothing here sends
//! mail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::DataSet;
use crate::recipients::is_valid_email;
use crate::template::{merge_row, scan};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("recipient field '{0}' is not a column of the data set")]
    UnknownRecipientField(String),
    #[error("row {row}: '{value}' is not a valid recipient address")]
    InvalidRecipient { row: usize, value: String },
    #[error("'{0}' is not a valid email address")]
    InvalidAddress(String),
    #[error("no recipients")]
    NoRecipients,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    /// Placeholder names left in subject or body after merging.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

/// A mail-merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeJob {
    pub subject: String,
    pub body: String,
    /// Column holding each row's address.
    pub recipient_field: String,
}

fn unresolved_names(subject: &str, body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in scan(subject).into_iter().chain(scan(body)) {
        if !names.contains(&token.name) {
            names.push(token.name);
        }
    }
    names
}

/// One message per non-blank row. Rows are reported 1-based.
pub fn compose_merge(job: &MergeJob, dataset: &DataSet) -> Result<Vec<Message>, ComposeError> {
    if dataset.field(&job.recipient_field).is_none() {
        return Err(ComposeError::UnknownRecipientField(job.recipient_field.clone()));
    }

    let mut messages = Vec::new();
    for (i, row) in dataset.rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let address = row.get(&job.recipient_field).unwrap_or("").trim();
        if !is_valid_email(address) {
            return Err(ComposeError::InvalidRecipient {
                row: i + 1,
                value: address.to_string(),
            });
        }
        let subject = merge_row(&job.subject, row, &dataset.fields);
        let body = merge_row(&job.body, row, &dataset.fields);
        let unresolved = unresolved_names(&subject, &body);
        messages.push(Message {
            to: vec![address.to_string()],
            subject,
            body,
            unresolved,
            ..Default::default()
        });
    }
    Ok(messages)
}

fn checked(addresses: &[String]) -> Result<Vec<String>, ComposeError> {
    addresses
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(|a| {
            if is_valid_email(a) {
                Ok(a.to_string())
            } else {
                Err(ComposeError::InvalidAddress(a.to_string()))
            }
        })
        .collect()
}

/// A single message with the same body for everyone.
pub fn compose_common(
    to: &[String],
    cc: &[String],
    bcc: &[String],
    subject: &str,
    body: &str,
) -> Result<Message, ComposeError> {
    let to = checked(to)?;
    if to.is_empty() {
        return Err(ComposeError::NoRecipients);
    }
    Ok(Message {
        to,
        cc: checked(cc)?,
        bcc: checked(bcc)?,
        subject: subject.to_string(),
        body: body.to_string(),
        unresolved: unresolved_names(subject, body),
    })
}
