//! Placeholder engine for `{{field}}` templates.
//!
//! Every function here is pure: no I/O, no state kept between calls, and
//! no error paths. Malformed or unresolvable placeholders degrade to
//! literal text.

pub mod insert;
pub mod merge;
pub mod preview;
pub mod scan;
pub mod validate;

pub use insert::{complete_field, completion_pending, insert_field};
pub use merge::{merge, merge_row, DataRow};
pub use preview::{render, render_marked, Markers, Segment};
pub use scan::{has_unresolved, scan, token_names, Token};
pub use validate::{is_valid, unknown_tokens, Field};
