use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// One `{{ ... }}` occurrence in a template.
///
/// `start`/`end` are byte offsets into the scanned template, so
/// `&template[start..end] == raw` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub raw: String,
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// Shortest span between a `{{` and the next `}}`, on a single line.
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("valid regex"))
}

/// Scan a template for placeholder tokens, left to right, non-overlapping.
///
/// A dangling `{{` without a closing `}}` is plain text and yields nothing.
pub fn scan(template: &str) -> Vec<Token> {
    placeholder_re()
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(Token {
                raw: whole.as_str().to_string(),
                name: inner.as_str().trim().to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Placeholder names in scan order, duplicates included.
pub fn token_names(template: &str) -> Vec<String> {
    scan(template).into_iter().map(|t| t.name).collect()
}

/// True when `text` still contains at least one placeholder.
///
/// Merged output keeps unresolved placeholders verbatim, so this is how a
/// caller detects an incomplete merge.
pub fn has_unresolved(text: &str) -> bool {
    placeholder_re().is_match(text)
}
