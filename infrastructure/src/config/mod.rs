//! Configuration file loading for luabridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LUABRIDGE_*` environment variables (`LUABRIDGE_BRIDGE__OPEN_LIBS=false`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./luabridge.toml` or `./.luabridge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/luabridge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBridgeConfig, FileConfig, FileGlobalValue, FileOutputConfig,
    FileStartupConfig,
};
pub use loader::ConfigLoader;
