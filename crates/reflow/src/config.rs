//! Store configuration
//!
//! Options can be built in code or loaded from a `reflow.toml` file:
//!
//! ```toml
//! diagnostics = true
//! max_dispatch_depth = 256
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, io};
use thiserror::Error;

const CONFIG_FILE: &str = "reflow.toml";
const HOME_CONFIG_FILE: &str = ".reflow.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for a [`Store`](crate::Store)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreOptions {
    /// Report contract violations through the diagnostics sink
    #[serde(default = "default_diagnostics")]
    pub diagnostics: bool,

    /// Drop dispatches nested deeper than this. `None` leaves recursion unguarded.
    #[serde(default)]
    pub max_dispatch_depth: Option<usize>,
}

fn default_diagnostics() -> bool {
    cfg!(debug_assertions)
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            diagnostics: default_diagnostics(),
            max_dispatch_depth: None,
        }
    }
}

impl StoreOptions {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load options from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = load_config_file() {
            match Self::from_toml_str(&content) {
                Ok(options) => {
                    log::info!("Loaded store options from file");
                    return options;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default store options");
        Self::default()
    }
}

/// Load config file content from CWD first, then home directory
///
/// Searches for:
/// 1. `reflow.toml` in the current working directory
/// 2. `.reflow.toml` in the home directory
pub fn load_config_file() -> Option<String> {
    if let Ok(content) = fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    let home_config = home_config_path()?;
    match fs::read_to_string(&home_config) {
        Ok(content) => {
            log::debug!("Loaded config from {}", home_config.display());
            Some(content)
        }
        Err(_) => None,
    }
}

fn home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(HOME_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = StoreOptions::default();
        assert_eq!(options.diagnostics, cfg!(debug_assertions));
        assert_eq!(options.max_dispatch_depth, None);
    }

    #[test]
    fn test_options_deserialize() {
        let toml = r#"
            diagnostics = false
            max_dispatch_depth = 64
        "#;
        let options = StoreOptions::from_toml_str(toml).unwrap();
        assert!(!options.diagnostics);
        assert_eq!(options.max_dispatch_depth, Some(64));
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options = StoreOptions::from_toml_str("max_dispatch_depth = 8").unwrap();
        assert_eq!(options.max_dispatch_depth, Some(8));
        // diagnostics falls back to the build default
        assert_eq!(options.diagnostics, cfg!(debug_assertions));
    }

    #[test]
    fn test_options_parse_error() {
        let err = StoreOptions::from_toml_str("max_dispatch_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = StoreOptions::from_file("does/not/exist/reflow.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("does/not/exist/reflow.toml"));
    }
}
