pub mod compose;
pub mod config;
pub mod dataset;
pub mod recipients;
pub mod samples;
pub mod template;

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
