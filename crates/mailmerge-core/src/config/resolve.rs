use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::types::MailmergeConfig;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Config files searched, in priority order:
/// 1. `.mailmerge/config.toml` — local project settings
/// 2. `~/.config/mailmerge/config.toml` — global user settings
///
/// First readable, parsable file wins; otherwise built-in defaults apply.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".mailmerge/config.toml")];
    if let Some(home) = home_dir() {
        paths.push(home.join(".config/mailmerge/config.toml"));
    }
    paths
}

/// Load configuration.
///
/// An explicit path must exist and parse. Without one, the search paths
/// are tried and the result is cached for the life of the process.
pub fn load_config(explicit: Option<&Path>) -> Result<(MailmergeConfig, ConfigSource)> {
    match explicit {
        Some(path) => {
            let config = parse_toml_file(path)?;
            debug!(path = %path.display(), "loaded explicit config");
            Ok((config, ConfigSource::File(path.to_path_buf())))
        }
        None => Ok(resolve_config().clone()),
    }
}

/// Resolve configuration from the search paths, cached after first use.
pub fn resolve_config() -> &'static (MailmergeConfig, ConfigSource) {
    static CACHE: OnceLock<(MailmergeConfig, ConfigSource)> = OnceLock::new();
    CACHE.get_or_init(|| resolve_from(&search_paths()))
}

fn resolve_from(paths: &[PathBuf]) -> (MailmergeConfig, ConfigSource) {
    for path in paths {
        if !path.is_file() {
            continue;
        }
        match parse_toml_file(path) {
            Ok(config) => {
                debug!(path = %path.display(), "resolved config");
                return (config, ConfigSource::File(path.clone()));
            }
            Err(e) => {
                warn!("skipping {}: {e:#}", path.display());
            }
        }
    }
    debug!("no config file found, using defaults");
    (MailmergeConfig::default(), ConfigSource::Defaults)
}

fn parse_toml_file(path: &Path) -> Result<MailmergeConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: MailmergeConfig =
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Platform-aware home directory lookup.
fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
