//! Domain layer for luabridge
//!
//! This crate contains the interpreter-agnostic value objects shared by every
//! layer. It has no dependency on the Lua runtime.
//!
//! # Core Concepts
//!
//! - **ScriptValue**: a host-side copy of an interpreter value
//! - **DottedPath**: a validated `"a.b.c"` chain of global-then-field lookups
//! - **Snapshots**: stack slots and recursive table entries used for dumps

pub mod config;
pub mod scripting;

// Re-export commonly used types
pub use config::OutputFormat;
pub use scripting::{
    path::{DottedPath, PathError},
    snapshot::{StackSlot, TableEntry, TableNode},
    value::ScriptValue,
};
