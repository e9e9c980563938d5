//! Infrastructure layer for luabridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
#[cfg(feature = "scripting")]
pub mod scripting;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBridgeConfig, FileConfig, FileGlobalValue,
    FileOutputConfig, FileStartupConfig,
};
#[cfg(feature = "scripting")]
pub use scripting::LuaBridge;
