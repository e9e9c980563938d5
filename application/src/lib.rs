//! Application layer for luabridge
//!
//! This crate contains the scripting bridge port, use cases, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BridgeConfig;
pub use ports::scripting_bridge::{BridgeError, NoScriptingBridge, ScriptingBridgePort};
pub use use_cases::run_scripts::{
    Answer, Query, RunScriptsInput, RunScriptsOutput, RunScriptsUseCase, ScriptFailure,
    ScriptSource,
};
