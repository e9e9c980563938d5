//! Lua sandbox: blocks C module loading for ABI safety.
//!
//! User Lua code is trusted, but C extension modules are not: a mismatched
//! ABI crashes the host instead of raising a Lua error.

use mlua::prelude::*;

/// Apply sandbox restrictions to the Lua VM.
///
/// Currently blocks:
/// - `package.loadlib`: prevents loading arbitrary .so/.dll
/// - `package.cpath`: clears the C module search path
///
/// A state opened without the `package` library has nothing to block.
pub fn apply_sandbox(lua: &Lua) -> LuaResult<()> {
    let package: LuaValue = lua.globals().get("package")?;
    if let LuaValue::Table(package) = package {
        package.set("loadlib", LuaValue::Nil)?;
        package.set("cpath", "")?;
    }
    Ok(())
}
