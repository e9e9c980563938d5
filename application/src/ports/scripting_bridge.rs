//! Scripting bridge port: interface for the embedded Lua interpreter.
//!
//! This port abstracts the interpreter so that:
//! - The application/presentation layers don't depend on mlua
//! - A stand-in implementation (`NoScriptingBridge`) is always available
//! - The `scripting` feature gate only affects infrastructure + CLI
//!
//! Every path argument is a dotted path (`"config.server.port"`). Paths are
//! validated before the interpreter is touched.

use luabridge_domain::{PathError, ScriptValue, StackSlot, TableEntry};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Error from a scripting bridge operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    #[error("[{operation}] Lua state not initialized")]
    NotInitialized { operation: &'static str },

    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("variable '{segment}' is not defined ({path})")]
    Unresolved {
        segment: String,
        path: String,
        /// Segments resolved before the failing one.
        resolved: usize,
    },

    #[error("'{segment}' is a {type_name}, not a table ({path})")]
    NotATable {
        segment: String,
        path: String,
        type_name: String,
    },

    #[error("cannot register a {type_name} value from the host")]
    Unsupported { type_name: String },

    #[error("evaluation stack is empty")]
    StackEmpty,

    #[error("script error: {message}")]
    Script { message: String },
}

impl BridgeError {
    /// Whether retrying (with another path, script or value) can succeed
    /// without reinitializing the interpreter.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NotInitialized { .. })
    }
}

/// Port for the scripting bridge.
///
/// The presentation and application layers interact with the interpreter
/// exclusively through this trait. The infrastructure layer provides the real
/// `LuaBridge` implementation; when the `scripting` feature is disabled,
/// `NoScriptingBridge` is used instead.
///
/// # Stack discipline
///
/// Every operation leaves the evaluation stack at its pre-call depth, on
/// success and on failure, except [`load_to_stack`](Self::load_to_stack) and
/// [`push`](Self::push) which add exactly one value when they succeed.
pub trait ScriptingBridgePort {
    /// Whether an interpreter state is currently live.
    fn is_initialized(&self) -> bool;

    /// Drop the current state (if any) and create a fresh one with the
    /// construction policy captured at creation time.
    fn reset(&mut self) -> Result<(), BridgeError>;

    /// Drop the current state. Every later operation reports
    /// `NotInitialized` until [`reset`](Self::reset) is called.
    fn close(&mut self);

    /// Load and execute a Lua script file.
    fn load_file(&mut self, path: &Path) -> Result<(), BridgeError>;

    /// Execute an inline Lua chunk.
    fn execute(&mut self, code: &str) -> Result<(), BridgeError>;

    /// Message of the most recent script failure, if any.
    fn last_error(&self) -> Option<&str>;

    /// Bind a primitive value to a global. `Nil` removes the global.
    fn register_global(&mut self, name: &str, value: ScriptValue) -> Result<(), BridgeError>;

    /// Bind a primitive value at a dotted path, creating missing
    /// intermediate tables.
    fn register_path(&mut self, path: &str, value: ScriptValue) -> Result<(), BridgeError>;

    /// Resolve a dotted path and return a copy of the value it names.
    fn resolve(&mut self, path: &str) -> Result<ScriptValue, BridgeError>;

    /// Resolve a dotted path and leave the value on top of the stack.
    fn load_to_stack(&mut self, path: &str) -> Result<(), BridgeError>;

    /// Segments resolved by the most recent walk.
    fn resolution_level(&self) -> usize;

    /// Direct keys of the table at `path`.
    ///
    /// Degrades to an empty list (with a logged diagnostic) when the path does
    /// not name a table. An empty table also yields an empty list.
    fn table_keys(&mut self, path: &str) -> Vec<String>;

    /// Recursive snapshot of the table at `path`.
    fn table_snapshot(&mut self, path: &str) -> Result<Vec<TableEntry>, BridgeError>;

    /// Set `key` on the table currently on top of the stack.
    fn set_field(&mut self, key: &str, value: ScriptValue) -> Result<(), BridgeError>;

    /// Push a primitive value onto the stack.
    fn push(&mut self, value: ScriptValue) -> Result<(), BridgeError>;

    /// Pop the top value off the stack.
    fn pop(&mut self) -> Option<ScriptValue>;

    /// Copy of the top value, without popping it.
    fn top(&self) -> Option<ScriptValue>;

    fn stack_depth(&self) -> usize;

    /// Stack contents, bottom to top.
    fn stack_snapshot(&self) -> Vec<StackSlot>;

    fn clear_stack(&mut self);
}

/// Bridge used when the `scripting` feature is disabled.
///
/// Behaves like a bridge whose state was never initialized: fallible
/// operations report `NotInitialized`, queries return neutral values.
pub struct NoScriptingBridge;

impl NoScriptingBridge {
    fn unavailable(operation: &'static str) -> BridgeError {
        warn!("[{}] Lua state not initialized", operation);
        BridgeError::NotInitialized { operation }
    }
}

impl ScriptingBridgePort for NoScriptingBridge {
    fn is_initialized(&self) -> bool {
        false
    }

    fn reset(&mut self) -> Result<(), BridgeError> {
        Err(Self::unavailable("reset"))
    }

    fn close(&mut self) {}

    fn load_file(&mut self, _path: &Path) -> Result<(), BridgeError> {
        Err(Self::unavailable("load_file"))
    }

    fn execute(&mut self, _code: &str) -> Result<(), BridgeError> {
        Err(Self::unavailable("execute"))
    }

    fn last_error(&self) -> Option<&str> {
        None
    }

    fn register_global(&mut self, _name: &str, _value: ScriptValue) -> Result<(), BridgeError> {
        Err(Self::unavailable("register_global"))
    }

    fn register_path(&mut self, _path: &str, _value: ScriptValue) -> Result<(), BridgeError> {
        Err(Self::unavailable("register_path"))
    }

    fn resolve(&mut self, _path: &str) -> Result<ScriptValue, BridgeError> {
        Err(Self::unavailable("resolve"))
    }

    fn load_to_stack(&mut self, _path: &str) -> Result<(), BridgeError> {
        Err(Self::unavailable("load_to_stack"))
    }

    fn resolution_level(&self) -> usize {
        0
    }

    fn table_keys(&mut self, _path: &str) -> Vec<String> {
        Self::unavailable("table_keys");
        Vec::new()
    }

    fn table_snapshot(&mut self, _path: &str) -> Result<Vec<TableEntry>, BridgeError> {
        Err(Self::unavailable("table_snapshot"))
    }

    fn set_field(&mut self, _key: &str, _value: ScriptValue) -> Result<(), BridgeError> {
        Err(Self::unavailable("set_field"))
    }

    fn push(&mut self, _value: ScriptValue) -> Result<(), BridgeError> {
        Err(Self::unavailable("push"))
    }

    fn pop(&mut self) -> Option<ScriptValue> {
        None
    }

    fn top(&self) -> Option<ScriptValue> {
        None
    }

    fn stack_depth(&self) -> usize {
        0
    }

    fn stack_snapshot(&self) -> Vec<StackSlot> {
        Vec::new()
    }

    fn clear_stack(&mut self) {}
}
