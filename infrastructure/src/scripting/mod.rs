//! Lua scripting bridge (feature-gated: `scripting`)
//!
//! Provides the `LuaBridge` that implements `ScriptingBridgePort` from the
//! application layer, backed by mlua (Lua 5.4).
//!
//! # Modules
//!
//! - `convert`: `ScriptValue` <-> `mlua::Value` conversion
//! - `stack`: host-held evaluation stack frames
//! - `inspect`: native table key enumeration and snapshots
//! - `sandbox`: C module blocking for safety
//! - `lua_bridge`: Main bridge struct tying everything together

mod convert;
mod inspect;
mod lua_bridge;
mod sandbox;
mod stack;

pub use lua_bridge::LuaBridge;
