//! Sample email bodies compiled into the binary.

use include_dir::{include_dir, Dir};

static SAMPLES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/samples");

/// Sample names (file stems), sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = SAMPLES_DIR
        .files()
        .filter(|f| f.path().extension().and_then(|e| e.to_str()) == Some("txt"))
        .filter_map(|f| f.path().file_stem().and_then(|s| s.to_str()))
        .collect();
    names.sort_unstable();
    names
}

/// Body of the named sample, if it exists.
pub fn get(name: &str) -> Option<&'static str> {
    SAMPLES_DIR
        .get_file(format!("{name}.txt"))
        .and_then(|f| f.contents_utf8())
}
