//! Interpreter construction policy.
//!
//! [`BridgeConfig`] is captured when a bridge is created and reused every time
//! the interpreter state is reset, so a reset never changes which libraries
//! or limits are in effect.

use serde::{Deserialize, Serialize};

/// How a fresh interpreter state is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Load the safe standard libraries (`string`, `table`, `math`, `io`, `os`, ...).
    pub open_libs: bool,
    /// Block C module loading (`package.loadlib`, `package.cpath`).
    pub sandbox: bool,
    /// Interpreter memory limit in bytes.
    pub memory_limit: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            open_libs: true,
            sandbox: true,
            memory_limit: None,
        }
    }
}

impl BridgeConfig {
    // ==================== Builder Methods ====================

    pub fn with_open_libs(mut self, open_libs: bool) -> Self {
        self.open_libs = open_libs;
        self
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_memory_limit(mut self, limit: Option<usize>) -> Self {
        self.memory_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = BridgeConfig::default();
        assert!(config.open_libs);
        assert!(config.sandbox);
        assert!(config.memory_limit.is_none());
    }

    #[test]
    fn test_builder() {
        let config = BridgeConfig::default()
            .with_open_libs(false)
            .with_sandbox(false)
            .with_memory_limit(Some(1 << 20));

        assert!(!config.open_libs);
        assert!(!config.sandbox);
        assert_eq!(config.memory_limit, Some(1 << 20));
    }
}
