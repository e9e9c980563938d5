//! Conversion between host `ScriptValue`s and interpreter values.

use luabridge_application::BridgeError;
use luabridge_domain::ScriptValue;
use mlua::prelude::*;

/// Copy an interpreter value into the host.
///
/// Reference types are not copied; they become `Table` or `Other(type name)`.
pub(crate) fn from_lua(value: &LuaValue) -> ScriptValue {
    match value {
        LuaValue::Nil => ScriptValue::Nil,
        LuaValue::Boolean(b) => ScriptValue::Boolean(*b),
        LuaValue::Integer(n) => ScriptValue::Integer(*n),
        LuaValue::Number(n) => ScriptValue::Number(*n),
        LuaValue::String(s) => ScriptValue::String(s.to_string_lossy().into()),
        LuaValue::Table(_) => ScriptValue::Table,
        other => ScriptValue::Other(other.type_name().to_string()),
    }
}

/// Build an interpreter value from a host primitive.
pub(crate) fn to_lua(lua: &Lua, value: &ScriptValue) -> Result<LuaValue, BridgeError> {
    if !value.is_registrable() {
        return Err(BridgeError::Unsupported {
            type_name: value.type_name().to_string(),
        });
    }

    let converted = match value {
        ScriptValue::Boolean(b) => LuaValue::Boolean(*b),
        ScriptValue::Integer(n) => LuaValue::Integer(*n),
        ScriptValue::Number(n) => LuaValue::Number(*n),
        ScriptValue::String(s) => {
            LuaValue::String(lua.create_string(s).map_err(lua_to_bridge_error)?)
        }
        ScriptValue::Nil | ScriptValue::Table | ScriptValue::Other(_) => LuaValue::Nil,
    };
    Ok(converted)
}

/// Convert an mlua error to a BridgeError.
pub(crate) fn lua_to_bridge_error(e: LuaError) -> BridgeError {
    BridgeError::Script {
        message: e.to_string(),
    }
}
