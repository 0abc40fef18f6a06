use serde::{Deserialize, Serialize};

use super::scan::scan;
use super::validate::{is_valid, Field};

/// One ordered unit of a template preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Text { value: String },
    Token { raw: String, name: String, valid: bool },
}

impl Segment {
    /// The template text this segment covers.
    pub fn display_text(&self) -> &str {
        match self {
            Segment::Text { value } => value,
            Segment::Token { raw, .. } => raw,
        }
    }

    /// Chip label: the trimmed name back inside delimiters. Text segments
    /// have no label.
    pub fn label(&self) -> Option<String> {
        match self {
            Segment::Text { .. } => None,
            Segment::Token { name, .. } => Some(format!("{{{{{name}}}}}")),
        }
    }
}

/// Split a template into text and classified token segments.
///
/// Always ends with a text segment holding whatever follows the last
/// token, so a template with no tokens renders as exactly one segment.
pub fn render(template: &str, fields: &[Field]) -> Vec<Segment> {
    let tokens = scan(template);
    let mut segments = Vec::with_capacity(tokens.len() * 2 + 1);
    let mut last = 0;

    for token in tokens {
        segments.push(Segment::Text {
            value: template[last..token.start].to_string(),
        });
        let valid = is_valid(&token.name, fields);
        last = token.end;
        segments.push(Segment::Token {
            raw: token.raw,
            name: token.name,
            valid,
        });
    }

    segments.push(Segment::Text {
        value: template[last..].to_string(),
    });
    segments
}

/// Delimiters wrapped around token labels in a plain-text preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub valid_open: String,
    pub valid_close: String,
    pub invalid_open: String,
    pub invalid_close: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            valid_open: "[".to_string(),
            valid_close: "]".to_string(),
            invalid_open: "[!".to_string(),
            invalid_close: "]".to_string(),
        }
    }
}

/// Flatten segments into a string, wrapping each token label in markers.
///
/// Tokens print as their trimmed label (`{{ name }}` shows as `{{name}}`),
/// so the output is for display only and does not rebuild the template.
/// Join [`Segment::display_text`] for the lossless form.
pub fn render_marked(segments: &[Segment], markers: &Markers) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text { value } => out.push_str(value),
            Segment::Token { name, valid, .. } => {
                let (open, close) = if *valid {
                    (&markers.valid_open, &markers.valid_close)
                } else {
                    (&markers.invalid_open, &markers.invalid_close)
                };
                out.push_str(open);
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
                out.push_str(close);
            }
        }
    }
    out
}
