//! Interpreter configuration from TOML (`[bridge]` section)

use luabridge_application::BridgeConfig;
use serde::{Deserialize, Serialize};

/// Raw bridge configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBridgeConfig {
    /// Load the safe standard libraries
    pub open_libs: bool,
    /// Block C module loading
    pub sandbox: bool,
    /// Interpreter memory limit in bytes
    pub memory_limit: Option<usize>,
}

impl Default for FileBridgeConfig {
    fn default() -> Self {
        let defaults = BridgeConfig::default();
        Self {
            open_libs: defaults.open_libs,
            sandbox: defaults.sandbox,
            memory_limit: defaults.memory_limit,
        }
    }
}

impl FileBridgeConfig {
    pub fn to_bridge_config(&self) -> BridgeConfig {
        BridgeConfig::default()
            .with_open_libs(self.open_libs)
            .with_sandbox(self.sandbox)
            .with_memory_limit(self.memory_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_section_deserialize() {
        let toml_str = r#"
[bridge]
open_libs = false
memory_limit = 1048576
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let bridge = config.bridge.to_bridge_config();
        assert!(!bridge.open_libs);
        assert!(bridge.sandbox);
        assert_eq!(bridge.memory_limit, Some(1_048_576));
    }
}
