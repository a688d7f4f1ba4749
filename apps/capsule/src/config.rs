//! # Configuration
//!
//! Optional `capsule.toml` next to the content, overridden by CLI flags.
//!
//! ```toml
//! content_dir = "content/capsules"
//! strict = false
//!
//! [log]
//! format = "text"   # or "json"
//! filter = "capsule=info,capsule_core=info"
//! ```
//!
//! Unknown keys are an error. A relative `content_dir` is resolved against
//! the directory holding the config file.

use capsule_core::{CapsuleError, DuplicatePolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "capsule.toml";

/// Content directory used when neither the file nor the CLI names one.
pub const DEFAULT_CONTENT_DIR: &str = "content/capsules";

/// Log filter used when neither `RUST_LOG` nor the file sets one.
pub const DEFAULT_LOG_FILTER: &str = "capsule=info,capsule_core=info";

// =============================================================================
// FILE SCHEMA
// =============================================================================

/// Contents of `capsule.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory of capsule records.
    pub content_dir: PathBuf,
    /// Reject duplicate slugs instead of overwriting.
    pub strict: bool,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            strict: false,
            log: LogConfig::default(),
        }
    }
}

/// `[log]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse the `CAPSULE_LOG_FORMAT` value. Anything but `json` is text.
    #[must_use]
    pub fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl AppConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, CapsuleError> {
        toml::from_str(content).map_err(|e| CapsuleError::ConfigError(e.to_string()))
    }

    /// Load configuration from a file.
    pub fn from_path(path: &Path) -> Result<Self, CapsuleError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CapsuleError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| CapsuleError::ConfigError(format!("{}: {}", path.display(), e)))?;

        if config.content_dir.is_relative()
            && let Some(root) = path.parent().filter(|p| !p.as_os_str().is_empty())
        {
            config.content_dir = root.join(&config.content_dir);
        }

        Ok(config)
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Without one, `capsule.toml` in the
    /// working directory is used if present, and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CapsuleError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_path(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Registry policy implied by `strict`.
    #[must_use]
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.strict {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::Overwrite
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
