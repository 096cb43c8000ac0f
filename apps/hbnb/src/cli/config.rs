//! # Configuration
//!
//! Settings come from three places, later ones winning:
//!
//! 1. `hbnb.toml` in the working directory (or the file given by `--config`)
//! 2. `HBNB_FILE` environment variable (store path only)
//! 3. `--file` on the command line (store path only)
//!
//! ```toml
//! file_path = "data/file.json"
//! prompt = "(hbnb) "
//! history = true
//! ```

use hbnb_core::StoreError;
use hbnb_core::primitives::DEFAULT_STORE_PATH;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "hbnb.toml";

/// Environment variable overriding the store path.
pub const FILE_ENV_VAR: &str = "HBNB_FILE";

/// Default interactive prompt.
pub const DEFAULT_PROMPT: &str = "(hbnb) ";

/// Resolved console settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Location of the JSON store.
    pub file_path: PathBuf,
    /// Prompt shown by the interactive editor.
    pub prompt: String,
    /// Keep line history in the interactive editor.
    pub history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_STORE_PATH),
            prompt: DEFAULT_PROMPT.to_string(),
            history: true,
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, StoreError> {
        toml::from_str(text).map_err(|e| StoreError::Serialization(format!("config: {}", e)))
    }

    /// Load the configuration file.
    ///
    /// An explicit path must exist. Without one, `hbnb.toml` is used when
    /// present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, StoreError> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Io(format!("cannot read config '{}': {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Self::from_toml_str(&text)
    }

    /// Apply the store path overrides (environment, then command line).
    pub fn with_overrides(mut self, env_file: Option<String>, flag_file: Option<PathBuf>) -> Self {
        if let Some(path) = env_file.filter(|p| !p.is_empty()) {
            self.file_path = PathBuf::from(path);
        }
        if let Some(path) = flag_file {
            self.file_path = path;
        }
        self
    }
}

/// Read the store path override from the environment.
pub fn file_from_env() -> Option<String> {
    std::env::var(FILE_ENV_VAR).ok()
}
