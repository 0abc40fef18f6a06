pub mod resolve;
pub mod types;

pub use resolve::{load_config, resolve_config, search_paths, ConfigSource};
pub use types::{MailmergeConfig, MergeSettings};
