//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod bridge;
mod output;
mod startup;

pub use bridge::FileBridgeConfig;
pub use output::FileOutputConfig;
pub use startup::{FileGlobalValue, FileStartupConfig, flatten_globals};

use luabridge_domain::{DottedPath, PathError, ScriptValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("bridge.memory_limit cannot be 0")]
    ZeroMemoryLimit,

    #[error("startup.scripts contains an empty path")]
    EmptyScriptPath,

    #[error("globals: invalid name '{name}': {source}")]
    InvalidGlobalName { name: String, source: PathError },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Interpreter settings
    pub bridge: FileBridgeConfig,
    /// Scripts loaded at startup
    pub startup: FileStartupConfig,
    /// Globals registered before any script runs
    pub globals: BTreeMap<String, FileGlobalValue>,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.bridge.memory_limit == Some(0) {
            issues.push(ConfigValidationError::ZeroMemoryLimit);
        }

        if self.startup.scripts.iter().any(|p| p.as_os_str().is_empty()) {
            issues.push(ConfigValidationError::EmptyScriptPath);
        }

        for (name, _) in flatten_globals(&self.globals) {
            if let Err(source) = DottedPath::parse(&name) {
                issues.push(ConfigValidationError::InvalidGlobalName { name, source });
            }
        }

        issues
    }

    /// Globals to register at startup, as `(dotted name, value)` pairs.
    pub fn startup_globals(&self) -> Vec<(String, ScriptValue)> {
        flatten_globals(&self.globals)
    }
}
