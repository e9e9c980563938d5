//! Scripting domain types
//!
//! Value objects for the Lua bridge. These types are infrastructure-agnostic;
//! the actual Lua runtime lives in the infrastructure layer behind
//! `ScriptingBridgePort`.

pub mod path;
pub mod snapshot;
pub mod value;
