//! Cursor-based placeholder insertion for editors.
//!
//! Cursors are byte offsets. Out-of-range cursors are clamped: past the
//! end means the end, and an offset inside a multi-byte character moves
//! back to that character's start. Insertion never panics and never
//! splits a character.

use tracing::debug;

/// Clamp `cursor` to `0..=template.len()` on a char boundary.
fn clamp_cursor(template: &str, cursor: usize) -> usize {
    let mut at = cursor.min(template.len());
    while !template.is_char_boundary(at) {
        at -= 1;
    }
    if at != cursor {
        debug!(cursor, clamped = at, "cursor outside template, clamped");
    }
    at
}

/// Insert `{{field_name}}` at `cursor`.
///
/// Returns the new template and the cursor just past the closing `}}`.
/// The cursor is a byte offset into the new template, so
/// `insert_field("Hello ", 6, "name")` gives `("Hello {{name}}", 14)`.
/// Counting one more (15) would point past the end of the string.
pub fn insert_field(template: &str, cursor: usize, field_name: &str) -> (String, usize) {
    let at = clamp_cursor(template, cursor);
    let placeholder = format!("{{{{{field_name}}}}}");
    let mut out = String::with_capacity(template.len() + placeholder.len());
    out.push_str(&template[..at]);
    out.push_str(&placeholder);
    out.push_str(&template[at..]);
    (out, at + placeholder.len())
}

/// True when the user has just typed `{{` and a field suggestion applies.
pub fn completion_pending(template: &str, cursor: usize) -> bool {
    let at = clamp_cursor(template, cursor);
    template[..at].ends_with("{{")
}

/// Finish a placeholder the user started typing.
///
/// With `{{` right before the cursor only `field_name}}` is inserted;
/// otherwise this behaves like [`insert_field`].
pub fn complete_field(template: &str, cursor: usize, field_name: &str) -> (String, usize) {
    if !completion_pending(template, cursor) {
        return insert_field(template, cursor, field_name);
    }
    let at = clamp_cursor(template, cursor);
    let completion = format!("{field_name}}}}}");
    let mut out = String::with_capacity(template.len() + completion.len());
    out.push_str(&template[..at]);
    out.push_str(&completion);
    out.push_str(&template[at..]);
    (out, at + completion.len())
}
